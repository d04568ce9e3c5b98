fn main() {
    if let Err(err) = hourglass_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
