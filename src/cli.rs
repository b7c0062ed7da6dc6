fn config_arg<'a, 'b>() -> clap::Arg<'a, 'b> {
    clap::Arg::with_name("config")
        .short("c")
        .long("config")
        .help("Path to .joblyrc file [default: .joblyrc]")
        .takes_value(true)
}

pub fn ask<'a, 'b>(database_path: &'a str) -> clap::App<'a, 'b> {
    clap::App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name("secret")
                .short("s")
                .long("secret")
                .help("Secret to sign and verify tokens. Can also be provided in the config file")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Makes Jobly verbose. Useful for debugging and seeing what's going on \"under the hood\"")
        )
        .subcommand(
            clap::App::new("serve")
                .about("Start jobly server")
                .arg(config_arg())
                .arg(
                    clap::Arg::with_name("port")
                        .short("p")
                        .long("port")
                        .help("Custom server port [default: 8787]")
                        .takes_value(true),
                )
                .arg(
                    clap::Arg::with_name("database")
                        .short("d")
                        .long("database")
                        .help("Database directory")
                        .default_value(database_path)
                        .takes_value(true),
                ),
        )
        .subcommand(
            clap::App::new("token")
                .about("Create a token based on the secret to authorize API requests")
                .arg(config_arg())
                .arg(
                    clap::Arg::with_name("username")
                        .short("u")
                        .long("username")
                        .help("User the token is issued to")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    clap::Arg::with_name("admin")
                        .short("a")
                        .long("admin")
                        .help("Grants admin rights to the token"),
                )
                .arg(
                    clap::Arg::with_name("duration")
                        .short("d")
                        .long("duration")
                        .help("Token duration until expires in minutes")
                        .default_value("43800")
                        .takes_value(true),
                )
        )
}
