mod api;
mod auth;
mod celebrations;
mod commands;
mod db;
mod models;
mod session;
#[cfg(test)]
mod test_utils;

use api::ApiConfig;
use db::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database and application state
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState::new(pool, ApiConfig::from_env()));
            app_handle.manage(state);
            println!("Database ready");
          }
          Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      // Account commands
      commands::auth::register,
      commands::auth::login,
      commands::auth::logout,
      commands::auth::get_auth_status,
      // Dashboard commands
      commands::plans::list_plans,
      commands::plans::create_plan,
      commands::plans::list_recent_sessions,
      // Exercise picker
      commands::exercises::search_exercises,
      commands::exercises::create_exercise,
      // Session logging
      commands::session::start_logging,
      commands::session::leave_logging,
      commands::session::session_snapshot,
      commands::session::add_exercise,
      commands::session::update_set_input,
      commands::session::log_set,
      commands::session::finish_session,
      // PR celebrations
      commands::celebrations::check_pending_prs,
      commands::celebrations::celebrate_pr,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
