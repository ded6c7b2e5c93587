fn main() {
    if let Err(err) = resume_reactor_lib::run() {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
