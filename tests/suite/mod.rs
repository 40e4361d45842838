mod config;
mod import_export;
mod session;
