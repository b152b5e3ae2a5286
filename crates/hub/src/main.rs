// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kedge-hub`: the multi-tenant reverse-tunnel control plane's hub
//! process. Wires the Agent-Proxy Handler (C3), Edges-Proxy Handler (C5),
//! the auth endpoints, and the scheduler/aggregator/lifecycle/mount
//! reconcilers (C8-C10) onto one HTTP(S) server, all driven from a single
//! `CancellationToken` per the concurrency model in §5.

mod bearer;
mod config;
mod error;
mod handlers;
mod kubeconfig;
mod routing;
mod server;
mod state;
mod ws_upgrade;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use kube::Config as KubeConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use config::{Args, LogFormat};
use kedge_auth::{Authorizer, OidcVerifier};
use kedge_store::ObjectStore;
use kedge_tunnel::{ConnectionRegistry, PickupTable};
use state::AppState;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_format);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("building tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "hub exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

#[derive(Debug, thiserror::Error)]
enum BootstrapError {
    #[error("loading kubeconfig: {0}")]
    Kubeconfig(#[source] kube::Error),
    #[error("building object store: {0}")]
    Store(#[source] kedge_store::StoreError),
    #[error("OIDC discovery failed: {0}")]
    Oidc(#[source] kedge_auth::AuthError),
    #[error("binding {addr}: {source}")]
    Bind { addr: String, #[source] source: std::io::Error },
    #[error("loading TLS material: {0}")]
    Tls(String),
}

async fn run(args: Args) -> Result<(), BootstrapError> {
    let shutdown = CancellationToken::new();
    install_signal_handler(shutdown.clone());

    let base_kube_config = load_kube_config(args.kubeconfig.as_deref()).await?;
    let system_kube_config = match args.external_kcp_kubeconfig.as_deref() {
        Some(path) => load_kube_config(Some(path)).await?,
        None => base_kube_config.clone(),
    };

    let system_client = kube::Client::try_from(system_kube_config).map_err(|e| BootstrapError::Store(e.into()))?;
    let system_store = ObjectStore::from_client(system_client, kedge_core::LogicalCluster::new("root:kedge"));

    let oidc = match config::oidc_issuer_url() {
        Some(issuer) => {
            let client_id = config::oidc_client_id().unwrap_or_default();
            let client_secret = config::oidc_client_secret();
            Some(
                OidcVerifier::discover(&issuer, &client_id, client_secret.as_deref(), args.dev_mode)
                    .await
                    .map_err(BootstrapError::Oidc)?,
            )
        }
        None => None,
    };

    let state = Arc::new(AppState {
        registry: Arc::new(ConnectionRegistry::new()),
        pickups: Arc::new(PickupTable::new()),
        static_tokens: config::static_tokens(),
        oidc,
        authorizer: Authorizer::new(
            kube::Client::try_from(base_kube_config.clone()).map_err(|e| BootstrapError::Store(e.into()))?,
        ),
        oidc_client_id: config::oidc_client_id().unwrap_or_default(),
        oidc_client_secret: config::oidc_client_secret(),
        base_kube_config,
        system_store: system_store.clone(),
        workload_namespace: args.workload_namespace.clone(),
        external_url: args.external_url.clone(),
        dev_mode: args.dev_mode,
        shutdown: shutdown.clone(),
    });

    spawn_reconcilers(&system_store, &args, shutdown.clone());

    let tls = load_tls(args.serving_cert_file.as_deref(), args.serving_key_file.as_deref())?;
    server::serve(&args.listen_addr, state, tls, shutdown.clone(), config::drain_timeout())
        .await
        .map_err(|source| BootstrapError::Bind { addr: args.listen_addr.clone(), source })?;

    tracing::info!("hub shut down cleanly");
    Ok(())
}

/// Starts the scheduler (C8), status aggregator (C9), and edge
/// heartbeat/mount reconcilers (C10) as independent tasks sharing
/// `cancel`, per §5's "implicit cooperation through a work queue" model.
fn spawn_reconcilers(store: &ObjectStore, args: &Args, cancel: CancellationToken) {
    let namespace = args.workload_namespace.clone();
    let external_url = args.external_url.clone();

    let scheduler_store = store.clone();
    let scheduler_namespace = namespace.clone();
    let scheduler_cancel = cancel.clone();
    tokio::spawn(async move {
        kedge_scheduler::scheduler::run(scheduler_store, scheduler_namespace, scheduler_cancel).await;
    });

    let aggregate_store = store.clone();
    let aggregate_namespace = namespace.clone();
    let aggregate_cancel = cancel.clone();
    tokio::spawn(async move {
        kedge_scheduler::aggregate::run(aggregate_store, aggregate_namespace, aggregate_cancel).await;
    });

    let heartbeat_store = store.clone();
    let heartbeat_cancel = cancel.clone();
    tokio::spawn(async move {
        kedge_scheduler::lifecycle::run(heartbeat_store, kedge_core::SystemClock, heartbeat_cancel).await;
    });

    let mount_store = store.clone();
    let mount_cancel = cancel.clone();
    tokio::spawn(async move {
        kedge_scheduler::mount::run(mount_store, namespace, external_url, mount_cancel).await;
    });
}

async fn load_kube_config(path: Option<&std::path::Path>) -> Result<KubeConfig, BootstrapError> {
    match path {
        Some(path) => {
            let kubeconfig = kube::config::Kubeconfig::read_from(path).map_err(BootstrapError::Kubeconfig)?;
            KubeConfig::from_custom_kubeconfig(kubeconfig, &kube::config::KubeConfigOptions::default())
                .await
                .map_err(BootstrapError::Kubeconfig)
        }
        None => KubeConfig::infer().await.map_err(BootstrapError::Kubeconfig),
    }
}

/// Loaded TLS material for [`server::serve`]; `None` means plain HTTP,
/// valid only alongside `--dev-mode` (§6, §4.0 Configuration).
pub(crate) struct TlsMaterial {
    pub certs: Vec<tokio_rustls::rustls::pki_types::CertificateDer<'static>>,
    pub key: tokio_rustls::rustls::pki_types::PrivateKeyDer<'static>,
}

fn load_tls(cert: Option<&std::path::Path>, key: Option<&std::path::Path>) -> Result<Option<TlsMaterial>, BootstrapError> {
    let (Some(cert), Some(key)) = (cert, key) else { return Ok(None) };

    let cert_bytes = std::fs::read(cert).map_err(|e| BootstrapError::Tls(format!("{}: {e}", cert.display())))?;
    let key_bytes = std::fs::read(key).map_err(|e| BootstrapError::Tls(format!("{}: {e}", key.display())))?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut cert_bytes.as_slice())
        .collect::<Result<_, _>>()
        .map_err(|e| BootstrapError::Tls(format!("parsing certificate: {e}")))?;
    let key = rustls_pemfile::private_key(&mut key_bytes.as_slice())
        .map_err(|e| BootstrapError::Tls(format!("parsing private key: {e}")))?
        .ok_or_else(|| BootstrapError::Tls("no private key found".to_string()))?;

    Ok(Some(TlsMaterial { certs, key }))
}

fn install_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut term = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(err) => {
                    tracing::warn!(%err, "installing SIGTERM handler failed; only SIGINT will trigger shutdown");
                    let _ = ctrl_c.await;
                    shutdown.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }
        tracing::info!("shutdown signal received, draining");
        shutdown.cancel();
    });
}
