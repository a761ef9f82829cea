use mxl_measure_counter::Session;
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: mxl-measure-counter <folder> [excluded part names]");
        eprintln!("       mxl-measure-counter ~/scores \"Piano, Voice\"");
        process::exit(1);
    }

    let mut session = Session::new();
    session.set_folder_path(args[1].as_str());
    if let Some(excluded) = args.get(2) {
        session.set_excluded_parts(excluded.as_str());
    }

    let result = session.process(|form, progress| {
        eprintln!(
            "[{:5.1}%] {} ({} measures)",
            form.progress,
            progress.path.display(),
            progress.measures_in_file
        );
    });

    if let Ok(report) = &result {
        for skipped in &report.skipped {
            eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    match serde_json::to_string_pretty(session.form()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error rendering form: {}", e);
            process::exit(1);
        }
    }

    if result.is_err() {
        process::exit(1);
    }
}
