//! CLI entry point.
//!
//! # Responsibility
//! - Without arguments, print a deterministic ping and the core version.
//! - With `<db_path> <user_id>`, print that user's routes and permission
//!   codes as JSON.

use rbac_core::{open_db, RbacViewService, SqliteRbacRepository, UserId};
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.as_slice() {
        [] => {
            println!("rbac_core ping={}", rbac_core::ping());
            println!("rbac_core version={}", rbac_core::core_version());
            Ok(())
        }
        [db_path, user_id] => print_user_view(db_path, user_id),
        _ => Err("usage: rbac_cli [<db_path> <user_id>]".into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_user_view(db_path: &str, user_id: &str) -> Result<(), Box<dyn Error>> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| format!("user_id must be an integer, got `{user_id}`"))?;

    let conn = open_db(db_path)?;
    let repo = SqliteRbacRepository::try_new(&conn)?;
    let service = RbacViewService::new(repo);

    let view = json!({
        "userId": user_id,
        "routes": service.routes(user_id)?,
        "permissionCodes": service.permission_codes(user_id)?,
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
