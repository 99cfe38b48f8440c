fn main() {
    if let Err(err) = srufilter::cli::run() {
        srufilter::ui::eprintln_error(&err);
        std::process::exit(srufilter::exit::exit_code(&err));
    }
}
