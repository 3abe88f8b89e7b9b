//! Operator console: inspect the user and chat-log tables and delete users
//! by name. Talks to the store directly, with no credential or token checks.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sqlx::SqlitePool;
use tokio::runtime::Runtime;

use wellbot::accounts::repo_types::User;
use wellbot::config::AppConfig;
use wellbot::db;
use wellbot::history::repo_types::QueryLog;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let rt = Runtime::new()?;
    let config = AppConfig::from_env()?;
    let pool = rt.block_on(db::connect(&config.database_url))?;
    rt.block_on(db::init_schema(&pool))?;

    let mut rl = DefaultEditor::new()?;

    loop {
        println!("\n===== Wellness Chatbot Database =====\n");
        print_users(&rt.block_on(User::list_all(&pool))?);
        print_logs(&rt.block_on(QueryLog::list_all(&pool))?);

        println!("\nOptions:");
        println!("1. Delete a user");
        println!("2. Refresh");
        println!("3. Exit");

        let choice = match rl.readline("Enter choice (1-3): ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        };

        match choice.trim() {
            "1" => {
                if let Err(e) = delete_flow(&rt, &pool, &mut rl) {
                    eprintln!("Error: {}", e);
                }
            }
            "2" => continue,
            "3" => break,
            _ => println!("Invalid choice. Try again."),
        }
    }

    Ok(())
}

fn delete_flow(rt: &Runtime, pool: &SqlitePool, rl: &mut DefaultEditor) -> Result<()> {
    let username = match rl.readline("Enter username to delete: ") {
        Ok(line) => line.trim().to_string(),
        Err(_) => return Ok(()),
    };
    if username.is_empty() {
        return Ok(());
    }

    let prompt = format!("Are you sure you want to delete '{}'? (yes/no): ", username);
    let confirm = match rl.readline(&prompt) {
        Ok(line) => line.trim().to_lowercase(),
        Err(_) => return Ok(()),
    };

    if confirm == "yes" {
        rt.block_on(User::delete(pool, &username))?;
        rt.block_on(QueryLog::delete_for_user(pool, &username))?;
        println!(
            "User '{}' and related chat logs deleted (if existed).",
            username
        );
    } else {
        println!("Deletion cancelled.");
    }
    Ok(())
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let header = format!(
        "{:<15} {:<65} {:<5} {:<10} {:<10} {:<20} {:<20} {:<20}",
        "Username", "Password", "Age", "Gender", "Language", "Created", "Last Login", "Last Update"
    );
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for user in users {
        println!(
            "{:<15} {:<65} {:<5} {:<10} {:<10} {:<20} {:<20} {:<20}",
            user.username,
            user.password,
            user.age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            user.gender.as_deref().unwrap_or("-"),
            user.language.as_deref().unwrap_or("-"),
            user.account_created.as_deref().unwrap_or("-"),
            user.last_login.as_deref().unwrap_or("-"),
            user.last_profile_update.as_deref().unwrap_or("-"),
        );
    }
}

fn print_logs(logs: &[QueryLog]) {
    if logs.is_empty() {
        println!("\nNo chat logs found.");
        return;
    }

    println!("\n===== Chat Logs =====\n");
    let header = format!(
        "{:<15} {:<30} {:<50} {:<20}",
        "Username", "User Message", "Bot Response", "Timestamp"
    );
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for log in logs {
        println!(
            "{:<15} {:<30} {:<50} {:<20}",
            log.username.as_deref().unwrap_or("-"),
            log.user_message.as_deref().unwrap_or("-"),
            log.bot_response.as_deref().unwrap_or("-"),
            log.timestamp.as_deref().unwrap_or("-"),
        );
    }
}
