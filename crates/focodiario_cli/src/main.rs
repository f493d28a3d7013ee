//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `focodiario_core` linkage.
//! - Walk every tab once against in-memory backends.
//! - Keep output deterministic apart from generated ids.

use focodiario_core::{
    App, Category, MemoryGoalRepository, MemoryIdentityProvider, Screen, Tab, TabContent,
};
use std::process::ExitCode;
use std::sync::Arc;

const DEMO_EPOCH_MS: i64 = 1_770_976_800_000;

fn main() -> ExitCode {
    println!("focodiario_core ping={}", focodiario_core::ping());
    println!("focodiario_core version={}", focodiario_core::core_version());

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), String> {
    let repo = Arc::new(MemoryGoalRepository::with_clock(DEMO_EPOCH_MS));
    let identity = Arc::new(MemoryIdentityProvider::new());
    let app = App::new(repo, identity);
    let today = chrono::NaiveDate::from_ymd_opt(2026, 2, 13).ok_or("invalid demo date")?;

    app.start();
    app.login("demo", "demo").map_err(|err| err.to_string())?;
    for (title, category) in [
        ("Correr 5km", Category::Health),
        ("Ler 10 páginas", Category::Studies),
    ] {
        app.create_goal(title, category)
            .map_err(|err| err.to_string())?;
    }
    let first = app.cache().goals().last().map(|goal| goal.id.clone());
    if let Some(id) = first {
        app.toggle_goal(&id).map_err(|err| err.to_string())?;
    }

    for tab in Tab::ALL {
        app.select_tab(tab);
        let Screen::Main(main) = app.screen(today) else {
            return Err("expected main screen".to_string());
        };
        println!("[{}] {} ({})", tab.label(), main.header.greeting, main.header.date_label);
        match main.content {
            TabContent::Goals(list) => {
                println!("  {} | {}", list.stats.summary(), list.count_label());
                for row in list.rows {
                    let mark = if row.completed { "x" } else { " " };
                    println!("  [{mark}] {} ({})", row.title, row.category_label);
                }
            }
            TabContent::History(history) => {
                for row in history.rows {
                    println!("  {}", row.title);
                }
            }
            TabContent::Achievements(view) => {
                for badge in view.badges {
                    let state = if badge.unlocked { "unlocked" } else { "locked" };
                    println!("  {} {state}", badge.spec.title);
                }
            }
            TabContent::Settings(settings) => {
                println!("  {} <{}>", settings.display_name, settings.email);
            }
        }
    }

    app.logout(|prompt| {
        println!("{prompt} sim");
        true
    });
    println!("signed_out={}", matches!(app.screen(today), Screen::Auth(_)));
    Ok(())
}
