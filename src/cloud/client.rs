//! Lambda layer operations through the AWS CLI
//!
//! Every call is a single attempt. A non-zero exit from the AWS CLI becomes
//! a cloud error carrying the CLI's own message.

use crate::cloud::models::{self, CallerIdentity, LayerVersion};
use crate::core::error::{LayergenError, Result};
use crate::core::types::LayerSpec;
use crate::packaging::ArchivedLayer;
use crate::toolchain::{CommandLine, CommandOutput, CommandRunner, Tool};
use tracing::{debug, info};

/// Error code the Lambda API uses for a missing layer or version
const NOT_FOUND_CODE: &str = "ResourceNotFoundException";

/// Thin adapter over `aws lambda ...`
pub struct LambdaClient<'a, R: CommandRunner> {
    runner: &'a R,
    aws: &'a str,
    profile: Option<&'a str>,
}

impl<'a, R: CommandRunner> LambdaClient<'a, R> {
    pub fn new(runner: &'a R, aws: &'a str, profile: Option<&'a str>) -> Self {
        Self {
            runner,
            aws,
            profile,
        }
    }

    fn command<I, S>(&self, args: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = CommandLine::new(self.aws);
        let command = match self.profile {
            Some(profile) => command.arg("--profile").arg(profile),
            None => command,
        };
        command.args(args)
    }

    fn lambda_command<I, S>(&self, args: I, region: &str) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command(["lambda"])
            .args(args)
            .args(["--region", region, "--output", "json"])
    }

    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        self.runner
            .run(command)
            .map_err(|e| e.attribute_to(Tool::Aws))
    }

    /// Run an AWS CLI command and return its stdout
    fn call(&self, command: &CommandLine) -> Result<String> {
        let output = self.run(command)?;
        if !output.success() {
            return Err(LayergenError::cloud(output.failure_message()));
        }
        Ok(output.stdout)
    }

    /// Check that the AWS CLI has usable credentials
    pub fn verify_credentials(&self) -> Result<CallerIdentity> {
        let command = self.command(["sts", "get-caller-identity", "--output", "json"]);
        let output = self.run(&command)?;
        if !output.success() {
            return Err(LayergenError::NotSignedIn {
                reason: output.failure_message(),
            });
        }

        let identity: CallerIdentity = parsed(serde_json::from_str(&output.stdout))?;
        debug!(account = %identity.account, arn = %identity.arn, "signed in");
        Ok(identity)
    }

    /// Region configured in the AWS CLI, if any
    pub fn default_region(&self) -> Result<Option<String>> {
        let output = self.run(&self.command(["configure", "get", "region"]))?;
        let region = output.stdout.trim();
        Ok((output.success() && !region.is_empty()).then(|| region.to_string()))
    }

    /// Use an explicit region or fall back to the AWS CLI default
    pub fn resolve_region(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(region) = explicit {
            return Ok(region.to_string());
        }
        self.default_region()?.ok_or(LayergenError::RegionNotSet)
    }

    /// Latest version of every layer in a region
    pub fn list_layers(&self, region: &str) -> Result<Vec<LayerVersion>> {
        let stdout = self.call(&self.lambda_command(["list-layers"], region))?;
        let mut versions = parsed(models::parse_list_layers(&stdout))?;
        models::sort_versions(&mut versions);
        Ok(versions)
    }

    /// Every version of one layer
    pub fn list_layer_versions(&self, name: &str, region: &str) -> Result<Vec<LayerVersion>> {
        let stdout = self.call(
            &self.lambda_command(["list-layer-versions", "--layer-name", name], region),
        )?;
        let mut versions = parsed(models::parse_list_layer_versions(&stdout, name))?;
        models::sort_versions(&mut versions);
        Ok(versions)
    }

    /// Publish an archive as a new layer version
    pub fn create_layer(&self, spec: &LayerSpec, archive: &ArchivedLayer) -> Result<LayerVersion> {
        let zip_file = format!("fileb://{}", archive.path.display());
        let description = spec.publish_description();
        let command = self.lambda_command(
            [
                "publish-layer-version",
                "--layer-name",
                spec.name.as_str(),
                "--zip-file",
                zip_file.as_str(),
                "--compatible-runtimes",
                spec.compatible_runtime.as_str(),
                "--description",
                description.as_str(),
            ],
            &spec.region,
        );

        info!(layer = %spec.name, region = %spec.region, "publishing layer version");
        let stdout = self.call(&command)?;
        let version = parsed(models::parse_layer_version(&stdout, spec.name.as_str()))?;
        info!(arn = %version.arn, "published");
        Ok(version)
    }

    /// Fetch one version, failing if it does not exist
    pub fn get_layer_version(&self, name: &str, version: u64, region: &str) -> Result<LayerVersion> {
        let version_arg = version.to_string();
        let command = self.lambda_command(
            [
                "get-layer-version",
                "--layer-name",
                name,
                "--version-number",
                version_arg.as_str(),
            ],
            region,
        );

        let output = self.run(&command)?;
        if !output.success() {
            let message = output.failure_message();
            if message.contains(NOT_FOUND_CODE) {
                return Err(LayergenError::LayerVersionNotFound {
                    name: name.to_string(),
                    version,
                    region: region.to_string(),
                });
            }
            return Err(LayergenError::cloud(message));
        }

        parsed(models::parse_layer_version(&output.stdout, name))
    }

    /// Delete one version
    ///
    /// Lambda reports success when deleting a version that does not exist,
    /// so the version is looked up first.
    pub fn delete_layer(&self, name: &str, version: u64, region: &str) -> Result<LayerVersion> {
        let existing = self.get_layer_version(name, version, region)?;

        let version_arg = version.to_string();
        self.call(&self.lambda_command(
            [
                "delete-layer-version",
                "--layer-name",
                name,
                "--version-number",
                version_arg.as_str(),
            ],
            region,
        ))?;

        info!(layer = %name, version, region = %region, "deleted layer version");
        Ok(existing)
    }
}

/// Output the AWS CLI reported success with but that is not the expected JSON
fn parsed<T>(result: serde_json::Result<T>) -> Result<T> {
    result.map_err(|e| LayergenError::cloud(format!("unexpected AWS CLI output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DependencySource, LayerName, Runtime};
    use crate::toolchain::runner::fake::ScriptedRunner;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const VERSION_JSON: &str = r#"{
        "LayerArn": "arn:aws:lambda:us-east-1:123456789012:layer:my-layer",
        "LayerVersionArn": "arn:aws:lambda:us-east-1:123456789012:layer:my-layer:5",
        "Description": "",
        "CreatedDate": "2024-05-01T12:00:00.000+0000",
        "Version": 5,
        "CompatibleRuntimes": ["python3.12"]
    }"#;

    const NOT_FOUND: &str = "An error occurred (ResourceNotFoundException) when calling the \
                             GetLayerVersion operation: The resource you requested does not exist.";

    fn spec() -> LayerSpec {
        LayerSpec {
            name: LayerName::parse("my-layer").unwrap(),
            runtime: Runtime::Python,
            source: DependencySource::Packages(vec!["requests".to_string()]),
            region: "us-east-1".to_string(),
            compatible_runtime: "python3.12".to_string(),
            description: Some("shared deps".to_string()),
        }
    }

    fn archive() -> ArchivedLayer {
        ArchivedLayer {
            path: PathBuf::from("/tmp/stage/my-layer.zip"),
            size_bytes: 10,
            file_count: 1,
        }
    }

    #[test]
    fn test_list_layers_rows_match_provider() {
        let runner = ScriptedRunner::new().ok(
            &["lambda", "list-layers"],
            r#"{"Layers": [
                {"LayerName": "b", "LatestMatchingVersion": {"LayerVersionArn": "arn:aws:lambda:r:1:layer:b:1", "Version": 1}},
                {"LayerName": "a", "LatestMatchingVersion": {"LayerVersionArn": "arn:aws:lambda:r:1:layer:a:9", "Version": 9}}
            ]}"#,
        );
        let client = LambdaClient::new(&runner, "aws", None);

        let versions = client.list_layers("eu-west-1").unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].name, "a");
        assert!(runner.called_with(&["--region", "eu-west-1", "--output", "json"]));
    }

    #[test]
    fn test_malformed_output_is_cloud_error() {
        let runner = ScriptedRunner::new()
            .ok(&["lambda", "list-layers"], "<html>502 Bad Gateway</html>")
            .ok(&["sts", "get-caller-identity"], "not json")
            .ok(&["publish-layer-version"], r#"{"Version": "five"}"#);
        let client = LambdaClient::new(&runner, "aws", None);

        let err = client.list_layers("us-east-1").unwrap_err();
        assert!(matches!(err, LayergenError::Cloud { .. }));
        assert!(err.to_string().contains("unexpected AWS CLI output"));
        assert_eq!(err.exit_code(), 5);

        assert_eq!(client.verify_credentials().unwrap_err().exit_code(), 5);
        assert_eq!(
            client.create_layer(&spec(), &archive()).unwrap_err().exit_code(),
            5
        );
    }

    #[test]
    fn test_missing_aws_binary_is_cloud_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let aws = dir.path().join("aws2").display().to_string();
        let client = LambdaClient::new(&crate::toolchain::SystemRunner, &aws, None);

        let err = client.list_layers("us-east-1").unwrap_err();
        assert!(matches!(err, LayergenError::ToolNotFound { tool: Tool::Aws, .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_profile_is_forwarded() {
        let runner = ScriptedRunner::new().ok(&["list-layer-versions"], r#"{"LayerVersions": []}"#);
        let client = LambdaClient::new(&runner, "aws", Some("staging"));

        assert!(client
            .list_layer_versions("my-layer", "us-east-1")
            .unwrap()
            .is_empty());
        assert!(runner.called_with(&["--profile", "staging"]));
        assert!(runner.called_with(&["--layer-name", "my-layer"]));
    }

    #[test]
    fn test_create_layer_publishes_zip() {
        let runner = ScriptedRunner::new().ok(&["publish-layer-version"], VERSION_JSON);
        let client = LambdaClient::new(&runner, "aws", None);

        let version = client.create_layer(&spec(), &archive()).unwrap();

        assert_eq!(version.version, 5);
        assert_eq!(version.name, "my-layer");
        assert!(runner.called_with(&["--zip-file", "fileb:///tmp/stage/my-layer.zip"]));
        assert!(runner.called_with(&["--compatible-runtimes", "python3.12"]));
        assert!(runner.called_with(&["--description", "shared deps"]));
    }

    #[test]
    fn test_create_layer_default_description() {
        let runner = ScriptedRunner::new().ok(&["publish-layer-version"], VERSION_JSON);
        let client = LambdaClient::new(&runner, "aws", None);
        let spec = LayerSpec {
            description: None,
            ..spec()
        };

        client.create_layer(&spec, &archive()).unwrap();
        assert!(runner.called_with(&["--description", "Python dependencies from requests"]));
    }

    #[test]
    fn test_create_layer_failure_is_verbatim() {
        let runner = ScriptedRunner::new().fail(
            &["publish-layer-version"],
            254,
            "An error occurred (RequestEntityTooLargeException)",
        );
        let client = LambdaClient::new(&runner, "aws", None);

        let err = client.create_layer(&spec(), &archive()).unwrap_err();
        assert!(matches!(err, LayergenError::Cloud { .. }));
        assert!(err.to_string().contains("RequestEntityTooLargeException"));
    }

    #[test]
    fn test_delete_missing_version_is_error() {
        let runner = ScriptedRunner::new()
            .fail(&["get-layer-version"], 254, NOT_FOUND)
            .ok(&["delete-layer-version"], "");
        let client = LambdaClient::new(&runner, "aws", None);

        let err = client.delete_layer("my-layer", 42, "us-east-1").unwrap_err();
        assert!(matches!(err, LayergenError::LayerVersionNotFound { version: 42, .. }));
        assert!(!runner.called_with(&["delete-layer-version"]));
    }

    #[test]
    fn test_delete_existing_version() {
        let runner = ScriptedRunner::new()
            .ok(&["get-layer-version"], VERSION_JSON)
            .ok(&["delete-layer-version"], "");
        let client = LambdaClient::new(&runner, "aws", None);

        let deleted = client.delete_layer("my-layer", 5, "us-east-1").unwrap();
        assert_eq!(deleted.version, 5);
        assert!(runner.called_with(&["delete-layer-version", "--layer-name", "my-layer"]));
        assert!(runner.called_with(&["--version-number", "5"]));
    }

    #[test]
    fn test_other_lookup_failures_stay_verbatim() {
        let runner = ScriptedRunner::new().fail(
            &["get-layer-version"],
            255,
            "Unable to locate credentials. You can configure credentials by running \"aws configure\".",
        );
        let client = LambdaClient::new(&runner, "aws", None);

        let err = client.get_layer_version("my-layer", 1, "us-east-1").unwrap_err();
        assert!(matches!(err, LayergenError::Cloud { .. }));
        assert!(err.to_string().contains("Unable to locate credentials"));
    }

    #[test]
    fn test_verify_credentials() {
        let runner = ScriptedRunner::new().ok(
            &["sts", "get-caller-identity"],
            r#"{"UserId": "AIDA", "Account": "123456789012", "Arn": "arn:aws:iam::123456789012:user/dev"}"#,
        );
        let client = LambdaClient::new(&runner, "aws", None);
        assert_eq!(client.verify_credentials().unwrap().account, "123456789012");

        let runner = ScriptedRunner::new().fail(&["sts"], 255, "Unable to locate credentials");
        let client = LambdaClient::new(&runner, "aws", None);
        assert!(matches!(
            client.verify_credentials().unwrap_err(),
            LayergenError::NotSignedIn { .. }
        ));
    }

    #[test]
    fn test_region_resolution() {
        let runner = ScriptedRunner::new().ok(&["configure", "get", "region"], "ap-southeast-2\n");
        let client = LambdaClient::new(&runner, "aws", None);
        assert_eq!(client.resolve_region(Some("us-east-1")).unwrap(), "us-east-1");
        assert_eq!(runner.call_count(), 0);
        assert_eq!(client.resolve_region(None).unwrap(), "ap-southeast-2");

        let runner = ScriptedRunner::new().fail(&["configure"], 1, "");
        let client = LambdaClient::new(&runner, "aws", None);
        assert!(matches!(
            client.resolve_region(None).unwrap_err(),
            LayergenError::RegionNotSet
        ));
    }
}
