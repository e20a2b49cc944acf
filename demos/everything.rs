//
//  se2-sdk
//  demos/everything.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Walks the whole plugin lifecycle against a live deployment:
//! tenants, builder session, drafts, build, test, promote, execute, results.
//!
//! ```text
//! SE2_ENV_TOKEN=... cargo run --example everything -- --server staging
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use se2_sdk::api::Se2Client;
use se2_sdk::config::{Endpoints, SdkConfig, ServerUrl};
use se2_sdk::Plugin;

const NAMESPACE: &str = "everythingns";
const PLUGIN: &str = "everythingbagel";

const SOURCE: &str = r#"import { log } from "@suborbital/plugin";

export const run = (input) => {
    let message = "Hello, " + input;

    message = message.split("").reverse().join("")

    log.info(message);

    return message;
};"#;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Server {
    Local,
    Staging,
    Production,
}

/// Exercise every SE2 operation end to end
#[derive(Debug, Parser)]
#[command(name = "everything", version = se2_sdk::VERSION)]
struct Args {
    /// Environment access key (falls back to EVERYTHING_TOKEN and SCC_ENV_TOKEN)
    #[arg(long, env = "SE2_ENV_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Deployment to talk to; ignored when --config is given
    #[arg(long, value_enum, default_value_t = Server::Staging)]
    server: Server,

    /// Read endpoints and timeouts from this config.toml instead
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template to build from
    #[arg(long, default_value = "javascript")]
    template: String,

    /// Seconds to wait for a promoted plugin to propagate
    #[arg(long, default_value_t = 8)]
    propagation_secs: u64,

    /// Keep the demo tenant instead of deleting it
    #[arg(long)]
    keep_tenant: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let client = client(&args)?;

    let tenant_name = format!("everything{}", chrono::Utc::now().format("%Y%m%d%H%M%S"));
    let result = run(&client, &args, &tenant_name).await;

    if !args.keep_tenant {
        header(&format!("deleting tenant '{}'", tenant_name));
        if let Err(e) = client.delete_tenant_by_name(&tenant_name).await {
            eprintln!("cleanup failed: {e}");
        }
    }

    result
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SE2_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn client(args: &Args) -> Result<Se2Client> {
    let token = args
        .token
        .clone()
        .or_else(SdkConfig::access_key_from_env)
        .context("no access key: set SE2_ENV_TOKEN or pass --token")?;

    let builder = Se2Client::builder().access_key(token);
    let builder = match &args.config {
        Some(path) => builder.from_config(&SdkConfig::load_from(path)?)?,
        None => builder.endpoints(match args.server {
            Server::Local => Endpoints::local(),
            Server::Staging => ServerUrl::Staging.into(),
            Server::Production => ServerUrl::Production.into(),
        }),
    };

    Ok(builder.build()?)
}

async fn run(client: &Se2Client, args: &Args, tenant_name: &str) -> Result<()> {
    header("tenants");
    let before = client.list_tenants().await?;
    println!("{} tenants visible", before.len());

    let tenant = client
        .create_tenant(tenant_name, "everything demo tenant")
        .await?;
    println!("created {:#?}", tenant);

    let updated = client
        .update_tenant_by_name(tenant_name, "updated description")
        .await?;
    println!("description is now '{}'", updated.description);

    let fetched = client.get_tenant_by_name(tenant_name).await?;
    println!("fetched {} ({})", fetched.name, fetched.id);

    match client.get_tenant_by_name("this-tenant-does-not-exist").await {
        Err(e) if e.is_not_found() => println!("missing tenant reported as not found"),
        other => bail!("expected not found, got {:?}", other),
    }

    header("builder");
    println!("healthy: {}", client.builder_health().await?);
    println!("{:#?}", client.builder_features().await?);

    let templates = client.list_templates().await?;
    if templates.is_empty() {
        bail!("the builder has no templates");
    }
    for template in &templates {
        println!("template {} ({})", template.name, template.lang);
    }

    header(&format!(
        "session for '{}', namespace '{}', plugin '{}'",
        tenant_name, NAMESPACE, PLUGIN
    ));
    let session = client
        .create_session(tenant_name, NAMESPACE, PLUGIN)
        .await?;

    let draft = client.create_plugin_draft(&args.template, &session).await?;
    println!("starter draft ({}):\n{}", draft.lang, draft.contents);

    header("build");
    let built = client.build_plugin(SOURCE, &session).await?;
    println!("{}", built.output_log);
    if !built.succeeded {
        bail!("build failed");
    }

    let draft = client.get_plugin_draft(&session).await?;
    println!("draft matches built source: {}", draft.contents == SOURCE);

    let tested = client.test_plugin_draft("capt picard", &session).await?;
    println!("test result: {} {}", tested.result, tested.error);

    header("promote");
    let mut plugin = Plugin::new(&tenant.environment, tenant_name, NAMESPACE, PLUGIN);
    let promoted = client.promote_draft(&mut plugin, &session).await?;
    println!("live version is {} ({})", promoted.reference, plugin);

    for deployed in client.get_tenant_plugins(tenant_name).await? {
        println!("deployed {} -> {:?}", deployed.fqmn, deployed.to_plugin());
    }

    header("execute");
    tokio::time::sleep(Duration::from_secs(args.propagation_secs)).await;

    let response = client.exec(&plugin, "uh hi").await?;
    println!("{} (request {:?})", response.text(), response.request_id);

    let pinned = client.exec_ref(&promoted.reference, "by reference").await?;
    println!("{}", pinned.text());

    let missing = Plugin::new(&tenant.environment, tenant_name, NAMESPACE, "nothing-here");
    match client.exec(&missing, "").await {
        Err(e) => println!("executing a missing plugin: {e}"),
        Ok(_) => bail!("a missing plugin ran"),
    }

    header("results");
    let editor_token = client.editor_token(&plugin).await?;
    println!("editor token has {} characters", editor_token.len());

    for meta in client.results_metadata(&plugin).await? {
        println!("{} at {} success={}", meta.uuid, meta.timestamp, meta.success);
        let output = client.function_result(&meta.uuid).await?;
        println!("  {}", String::from_utf8_lossy(&output));
    }

    Ok(())
}

fn header(title: &str) {
    println!("\n=== {} ===", title);
}
