use tasksched::cli::{report_error, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        std::process::exit(report_error(&e));
    }
}
