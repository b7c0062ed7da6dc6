use actix::Actor;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process;

#[macro_use]
extern crate log;

mod auth;
mod cli;
mod company;
mod config;
mod database;
mod errors;
mod job;
mod routes;
mod schema;
mod sql;

#[cfg(test)]
mod fixtures;

use config::Config;
use database::Database;
use errors::JoblyError;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_DATABASE_DIR: &str = "~/.jobly";
const DEFAULT_CONFIG_FILE: &str = ".joblyrc";
const DEFAULT_TOKEN_DURATION: i64 = 43800;

pub struct Context {
    pub secret: String,
}

fn exit_with(err: JoblyError) -> ! {
    error!("{}", err);
    eprintln!("{}", err);
    process::exit(1);
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let matches = cli::ask(DEFAULT_DATABASE_DIR).get_matches();

    if std::env::var("RUST_LOG").is_err() {
        let level = if matches.is_present("verbose") {
            "debug"
        } else {
            "info"
        };
        std::env::set_var("RUST_LOG", format!("jobly={},actix_web=info", level));
    }
    env_logger::init();

    let (command, command_matches) = match matches.subcommand() {
        (command, Some(command_matches)) => (command, command_matches),
        _ => return Ok(()),
    };

    let config_path = command_matches
        .value_of("config")
        .unwrap_or(DEFAULT_CONFIG_FILE);
    let config_path = shellexpand::tilde(config_path).into_owned();
    debug!("Reading config from {}", &config_path);
    let config = Config::load(&config_path).unwrap_or_else(|err| exit_with(err));

    let secret = match matches
        .value_of("secret")
        .map(|s| s.to_string())
        .or_else(|| config.secret.clone())
    {
        Some(secret) => secret,
        None => {
            eprintln!("Secret is required");
            process::exit(1);
        }
    };

    if command == "token" {
        let username = command_matches.value_of("username").unwrap_or_default();
        let duration = command_matches
            .value_of("duration")
            .and_then(|duration| duration.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_DURATION);
        let is_admin = command_matches.is_present("admin");

        match auth::create_token(&secret, username, is_admin, duration) {
            Ok(token) => println!("Bearer {}", token),
            Err(err) => eprintln!("Failed to create token {}", err),
        }
        return Ok(());
    }

    let port: u16 = command_matches
        .value_of("port")
        .and_then(|port| port.parse().ok())
        .or(config.port)
        .unwrap_or(DEFAULT_PORT);

    let database_dir = if command_matches.occurrences_of("database") > 0 {
        command_matches.value_of("database").map(|s| s.to_string())
    } else {
        config.database.clone()
    }
    .unwrap_or_else(|| DEFAULT_DATABASE_DIR.to_owned());
    let database_dir = shellexpand::tilde(&database_dir).into_owned();

    debug!("Opening database at {}", &database_dir);
    let database = Database::open(&database_dir).unwrap_or_else(|err| exit_with(err));
    let database = web::Data::new(database.start());
    let context = web::Data::new(Context { secret });

    let localhost = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let socket = SocketAddr::new(localhost, port);

    info!("Starting Jobly at {}", &socket);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::new().supports_credentials().finish())
            .app_data(context.clone())
            .app_data(database.clone())
            .configure(routes::configure)
    })
    .bind(socket)?
    .run()
    .await
}
