//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todorails_core` wiring: config, logging, storage, services.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use todorails_core::db::open_db;
use todorails_core::{
    init_logging_from_config, logging_status, CoreConfig, ErrorKind, SqliteTaskRepository,
    SqliteUserRepository, TaskService, UserService,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_smoke module=cli status=error error={err}");
            eprintln!("todorails smoke check failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::from_env();
    let file_logging = init_logging_from_config(&config)?;

    println!("todorails_core ping={}", todorails_core::ping());
    println!("todorails_core version={}", todorails_core::core_version());
    println!("todorails_core file_logging={file_logging}");
    if let Some((level, log_dir)) = logging_status() {
        println!(
            "todorails_core log_level={level} log_dir={}",
            log_dir.display()
        );
    }

    let conn = open_db(&config.db_path)?;
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn)?);
    let users = UserService::new(SqliteUserRepository::try_new(&conn)?);

    let task_count = tasks.get_all_tasks()?.len();
    let pending_count = tasks.get_pending_tasks()?.len();
    let today_count = tasks.get_today_tasks()?.len();
    let user_count = match users.get_all_users() {
        Ok(all) => all.len(),
        Err(err) if err.kind() == ErrorKind::NotFound => 0,
        Err(err) => return Err(err.into()),
    };

    println!("todorails_core db_path={}", config.db_path.display());
    println!(
        "todorails_core tasks={task_count} pending={pending_count} due_today={today_count} users={user_count}"
    );
    Ok(())
}
