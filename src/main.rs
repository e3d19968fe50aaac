fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = match bklst::cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => bklst::cli::exit_with_usage(e),
    };
    bklst::cli::init_logging(args.verbose);
    if let Err(e) = bklst::cli::run(&args) {
        eprintln!("{}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
