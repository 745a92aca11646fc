use clap::{Arg, ArgMatches, Command};
use std::error::Error;

use content_center::auth::user_store::hash_password;
use content_center::bootstrap::{AppBootstrap, AppConfig};

/// 构建命令行应用
fn build_app() -> Command {
    Command::new("content-center")
        .version(env!("CARGO_PKG_VERSION"))
        .about("配置驱动的内容与认证 Web 服务器")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("server")
                .about("启动 Web 服务器")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("覆盖配置中的监听地址"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("覆盖配置中的监听端口"),
                ),
        )
        .subcommand(Command::new("version").about("显示版本信息"))
        .subcommand(
            Command::new("hash-password")
                .about("生成 argon2 密码哈希，粘贴进 simpleauth-settings.json 的 password_hash")
                .arg(Arg::new("password").required(true).value_name("PASSWORD")),
        )
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let matches = build_app().get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            handle_server_command(sub_matches).await?;
        }
        Some(("version", _)) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Some(("hash-password", sub_matches)) => {
            let password = sub_matches
                .get_one::<String>("password")
                .expect("clap enforces the argument");
            println!("{}", hash_password(password)?);
        }
        _ => {
            // subcommand_required(true) 下不会到这里
            eprintln!("未知命令，请使用 --help 查看可用命令");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn handle_server_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    // 初始化路由注册表
    content_center::init_routes();

    // 先装载合并配置，再按配置初始化日志
    let _ = content_center::get_global_config_manager()?;
    content_center::init_tracing()?;

    let mut config = AppConfig::from_config()?;
    if let Some(host) = matches.get_one::<String>("host") {
        config.host = host.clone();
    }
    if let Some(port) = matches.get_one::<String>("port") {
        config.port = port.parse().unwrap_or(config.port);
    }

    AppBootstrap::new().with_config(config).run().await?;
    Ok(())
}
