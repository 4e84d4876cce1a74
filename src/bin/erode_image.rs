use clap::Parser;
use tracing_subscriber::fmt;
use voxtools::commands::ErodeArgs;

fn main() {
    fmt::init();

    let args = match ErodeArgs::try_parse() {
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
