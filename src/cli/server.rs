use clap::Parser;
use error_stack::{Result, ResultExt};
use murmur::server::StartServerError;
use murmur::{config::Server as Config, App};
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Expose the murmur HTTP API
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
    /// Creates demo users if there are no users yet.
    #[clap(long)]
    pub seed: bool,
}

pub fn run(args: &ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    murmur_tracing::init(&config.logging).change_context(StartServerError)?;
    actix_web::rt::System::new().block_on(async move {
        let app = App::new(config).await.change_context(StartServerError)?;
        if args.seed {
            app.seed_demo_users()
                .await
                .map_err(|e| error_stack::Report::new(e).change_context(StartServerError))?;
        }
        murmur::server::run(app).await
    })
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.http.address = address;
        }

        if let Some(port) = self.port {
            config.http.port = port;
        }

        if let Some(workers) = self.workers {
            config.http.workers = Some(workers.get());
        }
    }
}
