// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use futures::future::BoxFuture;
use k8s_openapi::api::core::v1 as corev1;
use kube::api::{Api, ListParams};
use serde::de::DeserializeOwned;
use snafu::futures::TryFutureExt;
use snafu::{ResultExt, Snafu, ensure};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{UpstreamArgs, is_valid_namespace};
use crate::dashboard::MetricsSource;
use crate::types::metrics::{
    NodeCapacityRecord, NodeMetricsList, NodeUsageRecord, PodMetricsList, PodUsageRecord,
    node_metrics_path, pod_metrics_path,
};
use crate::utils::tls;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("invalid Kubernetes API url '{}': {}", url, source))]
    InvalidApiUrl {
        url: String,
        source: http::uri::InvalidUri,
    },

    #[snafu(display("read CA bundle {} error: {}", path.display(), source))]
    ReadCaBundle {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("CA bundle {} error: {}", path.display(), source))]
    CaBundle { path: PathBuf, source: tls::Error },

    #[snafu(display("failed to create Kubernetes client: {}", source))]
    Client { source: kube::Error },

    #[snafu(display("failed to build request for {}: {}", path, source))]
    Request { path: String, source: http::Error },

    #[snafu(display("invalid namespace '{}'", namespace))]
    InvalidNamespace { namespace: String },

    #[snafu(display("Kubernetes API error: {}", source))]
    Kube { source: kube::Error },
}

/// Handle on the upstream Kubernetes API.
#[derive(Clone)]
pub struct Context {
    pub(crate) client: kube::Client,
}

impl Context {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Builds a client that authenticates with the configured bearer token.
    ///
    /// Certificate verification stays disabled unless a CA bundle is given.
    pub async fn connect(args: &UpstreamArgs) -> Result<Self, Error> {
        let uri: http::Uri = args
            .api_url
            .parse()
            .context(InvalidApiUrlSnafu { url: &args.api_url })?;

        let mut config = kube::Config::new(uri);
        config.auth_info.token = Some(args.token.clone().into());

        match &args.ca_file {
            Some(path) => {
                let pem = tokio::fs::read(path)
                    .context(ReadCaBundleSnafu { path })
                    .await?;
                let certs = tls::load_ca_bundle(&pem).context(CaBundleSnafu { path })?;
                info!(
                    "verifying the Kubernetes API server against {} certificate(s) from {}",
                    certs.len(),
                    path.display()
                );
                config.root_cert = Some(certs);
                config.accept_invalid_certs = false;
            }
            None => {
                warn!("TLS certificate verification for the Kubernetes API server is disabled");
                config.accept_invalid_certs = true;
            }
        }

        let client = kube::Client::try_from(config).context(ClientSnafu)?;
        Ok(Self::new(client))
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        debug!("GET {}", path);
        let request = http::Request::get(path)
            .header(http::header::ACCEPT, "application/json")
            .body(Vec::new())
            .context(RequestSnafu { path })?;

        self.client.request::<T>(request).context(KubeSnafu).await
    }

    /// `GET /apis/metrics.k8s.io/v1beta1/nodes`
    pub async fn node_metrics<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get_json(&node_metrics_path()).await
    }

    /// `GET /apis/metrics.k8s.io/v1beta1/namespaces/{namespace}/pods`
    pub async fn pod_metrics<T>(&self, namespace: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        ensure!(
            is_valid_namespace(namespace),
            InvalidNamespaceSnafu { namespace }
        );
        self.get_json(&pod_metrics_path(namespace)).await
    }

    /// Capacity of every node that reports one.
    pub async fn list_node_capacity(&self) -> Result<Vec<NodeCapacityRecord>, Error> {
        let api: Api<corev1::Node> = Api::all(self.client.clone());
        let nodes = api
            .list(&ListParams::default())
            .context(KubeSnafu)
            .await?;

        let records: Vec<_> = nodes
            .items
            .iter()
            .filter_map(NodeCapacityRecord::from_node)
            .collect();

        if records.len() < nodes.items.len() {
            debug!(
                "{} of {} nodes report no capacity",
                nodes.items.len() - records.len(),
                nodes.items.len()
            );
        }

        Ok(records)
    }
}

impl MetricsSource for Context {
    fn node_usage(&self) -> BoxFuture<'_, Result<Vec<NodeUsageRecord>, Error>> {
        Box::pin(async move {
            let list: NodeMetricsList = self.node_metrics().await?;
            Ok(list.into_records())
        })
    }

    fn node_capacity(&self) -> BoxFuture<'_, Result<Vec<NodeCapacityRecord>, Error>> {
        Box::pin(self.list_node_capacity())
    }

    fn pod_usage<'a>(
        &'a self,
        namespace: &'a str,
    ) -> BoxFuture<'a, Result<Vec<PodUsageRecord>, Error>> {
        Box::pin(async move {
            let list: PodMetricsList = self.pod_metrics(namespace).await?;
            Ok(list.into_records())
        })
    }
}
