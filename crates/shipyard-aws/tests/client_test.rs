use mockall::Sequence;
use mockall::mock;
use secrecy::{ExposeSecret, SecretString};
use shipyard_aws::client::{
    AwsClient, CredentialError, RegistryError, RepositoryLookup, RepositoryStatus,
};
use shipyard_aws::credentials::{AwsContext, SessionName, TemporaryCredentials};
use shipyard_aws::executor::AwsExecutor;
use shipyard_aws::AwsError;

mock! {
    Executor {}

    impl AwsExecutor for Executor {
        async fn exec(&self, args: &[String], context: &AwsContext) -> Result<String, AwsError>;
    }
}

fn assumed() -> AwsContext {
    AwsContext::assumed(
        "eu-west-1",
        TemporaryCredentials {
            access_key_id: "ASIATEST".to_owned(),
            secret_access_key: SecretString::from("secret"),
            session_token: SecretString::from("token"),
            expiration: "2026-10-17T12:00:00Z".to_owned(),
        },
    )
}

fn has(args: &[String], word: &str) -> bool {
    args.iter().any(|a| a == word)
}

fn service_error(code: &str) -> AwsError {
    AwsError::Service {
        code: code.to_owned(),
        operation: "DescribeRepositories".to_owned(),
        message: "boom".to_owned(),
    }
}

const ASSUME_ROLE_OUTPUT: &str = r#"{
    "Credentials": {
        "AccessKeyId": "ASIAASSUMED",
        "SecretAccessKey": "assumed-secret",
        "SessionToken": "assumed-token",
        "Expiration": "2026-10-17T13:00:00+00:00"
    },
    "AssumedRoleUser": {
        "AssumedRoleId": "AROA:terraform",
        "Arn": "arn:aws:sts::123456789012:assumed-role/admin/terraform"
    }
}"#;

// ── STS Tests ──

#[tokio::test]
async fn assume_role_uses_admin_role_and_caller_identity() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args, ctx| {
            has(args, "assume-role")
                && has(args, "arn:aws:iam::123456789012:role/admin")
                && has(args, "terraform")
                && !ctx.is_assumed()
                && ctx.region == "eu-west-1"
        })
        .times(1)
        .returning(|_, _| Ok(ASSUME_ROLE_OUTPUT.to_owned()));

    let client = AwsClient::with_executor(mock);
    let session = SessionName::new("terraform").unwrap();
    let creds = client
        .assume_role("eu-west-1", "123456789012", &session)
        .await
        .unwrap();

    assert_eq!(creds.access_key_id, "ASIAASSUMED");
    assert_eq!(creds.secret_access_key.expose_secret(), "assumed-secret");
    assert_eq!(creds.session_token.expose_secret(), "assumed-token");
    assert_eq!(creds.expiration, "2026-10-17T13:00:00+00:00");
}

#[tokio::test]
async fn assume_role_denied_is_an_authorization_error() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().times(1).returning(|_, _| {
        Err(AwsError::Service {
            code: "AccessDenied".to_owned(),
            operation: "AssumeRole".to_owned(),
            message: "not authorized".to_owned(),
        })
    });

    let client = AwsClient::with_executor(mock);
    let session = SessionName::new("terraform").unwrap();
    let result = client.assume_role("eu-west-1", "123456789012", &session).await;

    assert!(matches!(
        result,
        Err(CredentialError::Denied { ref role_arn, ref code, .. })
            if role_arn == "arn:aws:iam::123456789012:role/admin" && code == "AccessDenied"
    ));
}

#[tokio::test]
async fn assume_role_without_cli_is_unavailable() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().returning(|_, _| {
        Err(AwsError::NotFound {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = AwsClient::with_executor(mock);
    let session = SessionName::new("terraform").unwrap();
    let result = client.assume_role("eu-west-1", "1", &session).await;

    assert!(matches!(result, Err(CredentialError::Unavailable { .. })));
}

#[tokio::test]
async fn assume_role_garbage_output_is_rejected() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_, _| Ok("{}".to_owned()));

    let client = AwsClient::with_executor(mock);
    let session = SessionName::new("terraform").unwrap();
    let result = client.assume_role("eu-west-1", "1", &session).await;

    assert!(matches!(result, Err(CredentialError::InvalidResponse { .. })));
}

// ── Describe Tests ──

#[tokio::test]
async fn describe_repository_classifies_outcomes() {
    let mut mock = MockExecutor::new();
    let mut seq = Sequence::new();

    mock.expect_exec()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("{\"repositories\": []}".to_owned()));
    mock.expect_exec()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(service_error("RepositoryNotFoundException")));
    mock.expect_exec()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(service_error("ThrottlingException")));

    let client = AwsClient::with_executor(mock);
    let ctx = assumed();

    assert!(matches!(
        client.describe_repository(&ctx, "payments").await,
        RepositoryLookup::Found
    ));
    assert!(matches!(
        client.describe_repository(&ctx, "payments").await,
        RepositoryLookup::NotFound
    ));
    assert!(matches!(
        client.describe_repository(&ctx, "payments").await,
        RepositoryLookup::Failed(AwsError::Service { ref code, .. }) if code == "ThrottlingException"
    ));
}

// ── Ensure Repository Tests ──

#[tokio::test]
async fn ensure_repository_creates_and_sets_policy_when_missing() {
    let mut mock = MockExecutor::new();
    let mut seq = Sequence::new();

    mock.expect_exec()
        .withf(|args, _| has(args, "describe-repositories") && has(args, "payments"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(service_error("RepositoryNotFoundException")));
    mock.expect_exec()
        .withf(|args, ctx| has(args, "create-repository") && has(args, "payments") && ctx.is_assumed())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("{}".to_owned()));
    mock.expect_exec()
        .withf(|args, _| {
            has(args, "set-repository-policy")
                && args
                    .iter()
                    .any(|a| a.contains("arn:aws:iam::210987654321:root"))
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok("{}".to_owned()));

    let client = AwsClient::with_executor(mock);
    let status = client
        .ensure_repository(&assumed(), "payments", "210987654321")
        .await
        .unwrap();

    assert_eq!(status, RepositoryStatus::Created);
}

#[tokio::test]
async fn ensure_repository_is_idempotent() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args, _| has(args, "describe-repositories"))
        .times(2)
        .returning(|_, _| Ok("{\"repositories\": [{}]}".to_owned()));
    mock.expect_exec()
        .withf(|args, _| has(args, "create-repository") || has(args, "set-repository-policy"))
        .times(0);

    let client = AwsClient::with_executor(mock);
    let ctx = assumed();

    let first = client.ensure_repository(&ctx, "payments", "2").await.unwrap();
    let second = client.ensure_repository(&ctx, "payments", "2").await.unwrap();

    assert_eq!(first, RepositoryStatus::Existing);
    assert_eq!(second, RepositoryStatus::Existing);
}

#[tokio::test]
async fn ensure_repository_reraises_other_describe_failures() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args, _| has(args, "describe-repositories"))
        .times(1)
        .returning(|_, _| Err(service_error("AccessDeniedException")));
    mock.expect_exec()
        .withf(|args, _| has(args, "create-repository"))
        .times(0);

    let client = AwsClient::with_executor(mock);
    let result = client.ensure_repository(&assumed(), "payments", "2").await;

    assert!(matches!(
        result,
        Err(RegistryError::Describe { source: AwsError::Service { ref code, .. }, .. })
            if code == "AccessDeniedException"
    ));
}

#[tokio::test]
async fn ensure_repository_policy_failure_leaves_repository() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args, _| has(args, "describe-repositories"))
        .returning(|_, _| Err(service_error("RepositoryNotFoundException")));
    mock.expect_exec()
        .withf(|args, _| has(args, "create-repository"))
        .times(1)
        .returning(|_, _| Ok("{}".to_owned()));
    mock.expect_exec()
        .withf(|args, _| has(args, "set-repository-policy"))
        .times(1)
        .returning(|_, _| Err(service_error("LimitExceededException")));
    mock.expect_exec()
        .withf(|args, _| has(args, "delete-repository"))
        .times(0);

    let client = AwsClient::with_executor(mock);
    let result = client.ensure_repository(&assumed(), "payments", "2").await;

    assert!(matches!(result, Err(RegistryError::Policy { .. })));
}

#[tokio::test]
async fn ensure_repository_refuses_caller_identity() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().times(0);

    let client = AwsClient::with_executor(mock);
    let result = client
        .ensure_repository(&AwsContext::caller("eu-west-1"), "payments", "2")
        .await;

    assert!(matches!(result, Err(RegistryError::Unprivileged)));
}

// ── Authorization Token Tests ──

#[tokio::test]
async fn authorization_data_returns_every_endpoint() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args, _| has(args, "get-authorization-token"))
        .times(1)
        .returning(|_, _| {
            Ok(r#"{"authorizationData": [
                {"authorizationToken": "QVdTOmZpcnN0", "proxyEndpoint": "https://1.dkr.ecr.eu-west-1.amazonaws.com", "expiresAt": "2026-10-17T20:00:00+00:00"},
                {"authorizationToken": "QVdTOnNlY29uZA==", "proxyEndpoint": "https://2.dkr.ecr.eu-west-1.amazonaws.com", "expiresAt": "2026-10-17T20:00:00+00:00"}
            ]}"#
            .to_owned())
        });

    let client = AwsClient::with_executor(mock);
    let data = client.authorization_data(&assumed()).await.unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(data[0].authorization_token, "QVdTOmZpcnN0");
    assert_eq!(
        data[1].proxy_endpoint,
        "https://2.dkr.ecr.eu-west-1.amazonaws.com"
    );
}

#[tokio::test]
async fn authorization_data_failure() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_, _| {
        Err(AwsError::CommandFailed {
            args: vec![],
            stderr: "Unable to locate credentials".to_owned(),
        })
    });

    let client = AwsClient::with_executor(mock);
    let result = client.authorization_data(&assumed()).await;

    assert!(matches!(result, Err(RegistryError::Token { .. })));
}
