fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match searxng_alfred_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[searxng-alfred] {error}");
            std::process::exit(2);
        }
    };

    if options.show_version {
        println!("searxng-alfred {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    println!("{}", searxng_alfred_core::runtime::run_with_options(&options));
}
