use clap::Parser;
use tracing_subscriber::fmt;
use voxtools::commands::ExtractSliceArgs;

fn main() {
    fmt::init();

    let args = match ExtractSliceArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version are not failures; everything else is.
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = args.run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
