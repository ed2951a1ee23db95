//! In-memory cluster API.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use kubeprov_cluster_api::{
    CertificateAuthority, Cluster, ClusterApi, ClusterApiError, ClusterStatus,
    CreateClusterRequest, UpdateClusterConfigRequest, UpdateClusterVersionRequest,
};

/// A call received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateCluster(CreateClusterRequest),
    DescribeCluster(String),
    DeleteCluster(String),
    UpdateClusterConfig(UpdateClusterConfigRequest),
    UpdateClusterVersion(UpdateClusterVersionRequest),
}

impl ApiCall {
    /// Returns true for calls that change remote state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, ApiCall::DescribeCluster(_))
    }
}

/// Error the fake should return instead of succeeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedError {
    NotFound,
    Api { status: u16, code: String },
}

impl InjectedError {
    /// A generic remote failure with the given error code.
    pub fn api(code: impl Into<String>) -> Self {
        Self::Api {
            status: 400,
            code: code.into(),
        }
    }

    fn to_error(&self, name: &str) -> ClusterApiError {
        match self {
            InjectedError::NotFound => ClusterApiError::NotFound(name.to_string()),
            InjectedError::Api { status, code } => {
                ClusterApiError::api(*status, code.clone(), "mock error")
            }
        }
    }
}

#[derive(Debug)]
struct FakeState {
    calls: Vec<ApiCall>,
    status: ClusterStatus,
    version: String,
    create_error: Option<InjectedError>,
    describe_error: Option<InjectedError>,
    delete_error: Option<InjectedError>,
    update_config_error: Option<InjectedError>,
    update_version_error: Option<InjectedError>,
}

/// Cluster API double.
///
/// Describes report an `ACTIVE` cluster at version `"1.0"` unless configured
/// otherwise. Creates echo the request back with status `CREATING`.
#[derive(Debug)]
pub struct FakeClusterApi {
    state: Mutex<FakeState>,
}

impl FakeClusterApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                status: ClusterStatus::Active,
                version: "1.0".to_string(),
                create_error: None,
                describe_error: None,
                delete_error: None,
                update_config_error: None,
                update_version_error: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        // A panicking test thread must not hide the recorded calls from others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the status reported by describe.
    pub fn set_status(&self, status: ClusterStatus) {
        self.state().status = status;
    }

    /// Set the live version reported by describe.
    pub fn set_version(&self, version: impl Into<String>) {
        self.state().version = version.into();
    }

    /// Make create fail.
    pub fn fail_create(&self, error: InjectedError) {
        self.state().create_error = Some(error);
    }

    /// Make describe fail.
    pub fn fail_describe(&self, error: InjectedError) {
        self.state().describe_error = Some(error);
    }

    /// Make delete fail.
    pub fn fail_delete(&self, error: InjectedError) {
        self.state().delete_error = Some(error);
    }

    /// Make the configuration update fail.
    pub fn fail_update_config(&self, error: InjectedError) {
        self.state().update_config_error = Some(error);
    }

    /// Make the version update fail.
    pub fn fail_update_version(&self, error: InjectedError) {
        self.state().update_version_error = Some(error);
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Calls that changed remote state.
    pub fn mutating_calls(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_mutating).collect()
    }

    /// The most recent create request.
    pub fn last_create(&self) -> Option<CreateClusterRequest> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ApiCall::CreateCluster(request) => Some(request),
            _ => None,
        })
    }

    /// The most recent describe target.
    pub fn last_describe(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ApiCall::DescribeCluster(name) => Some(name),
            _ => None,
        })
    }

    /// The most recent configuration update.
    pub fn last_config_update(&self) -> Option<UpdateClusterConfigRequest> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ApiCall::UpdateClusterConfig(request) => Some(request),
            _ => None,
        })
    }

    /// The most recent version update.
    pub fn last_version_update(&self) -> Option<UpdateClusterVersionRequest> {
        self.calls().into_iter().rev().find_map(|call| match call {
            ApiCall::UpdateClusterVersion(request) => Some(request),
            _ => None,
        })
    }

    fn record(&self, call: ApiCall) {
        self.state().calls.push(call);
    }
}

impl Default for FakeClusterApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterApi for FakeClusterApi {
    async fn create_cluster(
        &self,
        request: &CreateClusterRequest,
    ) -> Result<Cluster, ClusterApiError> {
        self.record(ApiCall::CreateCluster(request.clone()));

        if let Some(error) = &self.state().create_error {
            return Err(error.to_error(&request.name));
        }

        Ok(Cluster {
            name: request.name.clone(),
            arn: Some(format!("arn:{}", request.name)),
            version: Some("1.0".to_string()),
            role_arn: Some(request.role_arn.clone()),
            status: ClusterStatus::Creating,
            certificate_authority: Some(CertificateAuthority {
                data: Some("certificateAuthority-data".to_string()),
            }),
            ..Default::default()
        })
    }

    async fn describe_cluster(&self, name: &str) -> Result<Cluster, ClusterApiError> {
        self.record(ApiCall::DescribeCluster(name.to_string()));

        let state = self.state();
        if let Some(error) = &state.describe_error {
            return Err(error.to_error(name));
        }

        Ok(Cluster {
            name: name.to_string(),
            arn: Some("arn:cluster-arn".to_string()),
            version: Some(state.version.clone()),
            endpoint: Some("http://endpoint".to_string()),
            role_arn: Some("arn:role".to_string()),
            status: state.status,
            certificate_authority: Some(CertificateAuthority {
                data: Some("certificateAuthority-data".to_string()),
            }),
            ..Default::default()
        })
    }

    async fn delete_cluster(&self, name: &str) -> Result<(), ClusterApiError> {
        self.record(ApiCall::DeleteCluster(name.to_string()));

        match &self.state().delete_error {
            Some(error) => Err(error.to_error(name)),
            None => Ok(()),
        }
    }

    async fn update_cluster_config(
        &self,
        request: &UpdateClusterConfigRequest,
    ) -> Result<(), ClusterApiError> {
        self.record(ApiCall::UpdateClusterConfig(request.clone()));

        match &self.state().update_config_error {
            Some(error) => Err(error.to_error(&request.name)),
            None => Ok(()),
        }
    }

    async fn update_cluster_version(
        &self,
        request: &UpdateClusterVersionRequest,
    ) -> Result<(), ClusterApiError> {
        self.record(ApiCall::UpdateClusterVersion(request.clone()));

        match &self.state().update_version_error {
            Some(error) => Err(error.to_error(&request.name)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_records_calls_in_order() {
        let api = FakeClusterApi::new();
        api.describe_cluster("c1").await.unwrap();
        api.delete_cluster("c1").await.unwrap();

        assert_eq!(
            api.calls(),
            vec![
                ApiCall::DescribeCluster("c1".to_string()),
                ApiCall::DeleteCluster("c1".to_string()),
            ]
        );
        assert_eq!(api.mutating_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_injected_errors() {
        let api = FakeClusterApi::new();
        api.fail_describe(InjectedError::NotFound);
        api.fail_delete(InjectedError::api("ResourceInUseException"));

        assert!(api.describe_cluster("c1").await.unwrap_err().is_not_found());
        let err = api.delete_cluster("c1").await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "ResourceInUseException: mock error");
    }

    #[tokio::test]
    async fn test_fake_injected_errors_on_mutations() {
        let api = FakeClusterApi::new();
        api.fail_create(InjectedError::api("ResourceLimitExceededException"));
        api.fail_update_config(InjectedError::api("InvalidParameterException"));
        api.fail_update_version(InjectedError::Api {
            status: 503,
            code: "ServiceUnavailableException".to_string(),
        });

        let create = CreateClusterRequest {
            name: "c1".to_string(),
            role_arn: "arn:of:role".to_string(),
            version: None,
            resources_vpc_config: None,
            logging: None,
        };
        assert!(api.create_cluster(&create).await.is_err());

        let config = UpdateClusterConfigRequest {
            name: "c1".to_string(),
            logging: None,
            resources_vpc_config: None,
        };
        assert!(api.update_cluster_config(&config).await.is_err());

        let version = UpdateClusterVersionRequest {
            name: "c1".to_string(),
            version: "1.1".to_string(),
        };
        assert!(api.update_cluster_version(&version).await.unwrap_err().is_retryable());

        // Failed calls are still recorded.
        assert_eq!(api.mutating_calls().len(), 3);
    }
}
