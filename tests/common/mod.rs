//! Test utilities for layergen integration tests
//!
//! Builds a throwaway directory holding fake `aws`, `pip` and `npm`
//! scripts. The fake AWS CLI logs every invocation and answers from JSON
//! files in the same directory, so tests can assert on exactly which calls
//! the binary made.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const IDENTITY: &str =
    r#"{"UserId": "AIDATEST", "Account": "123456789012", "Arn": "arn:aws:iam::123456789012:user/test"}"#;

/// How the fake package manager behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallBehavior {
    /// Install one package into the target directory
    Succeed,
    /// Exit 0 without installing anything
    InstallNothing,
    /// Exit 1 with an error on stderr
    Fail,
    /// Install a package that contains a symlink to a missing file
    DanglingSymlink,
}

pub struct FakeTools {
    pub dir: TempDir,
    pub config_dir: TempDir,
}

impl FakeTools {
    pub fn new(install: InstallBehavior) -> Self {
        let dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();

        write_script(&dir.path().join("aws"), &aws_script(dir.path()));
        write_script(&dir.path().join("pip"), &pip_script(install));
        write_script(&dir.path().join("npm"), &npm_script(install));

        Self { dir, config_dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Make `aws configure get region` answer with this region
    pub fn with_cli_region(self, region: &str) -> Self {
        fs::write(self.path().join("region.txt"), region).unwrap();
        self
    }

    /// Versions `get-layer-version` should find, one per line
    pub fn with_existing_versions(self, versions: &[u64]) -> Self {
        let lines: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        fs::write(self.path().join("versions.txt"), lines.join("\n") + "\n").unwrap();
        self
    }

    pub fn with_list_layers(self, json: &str) -> Self {
        fs::write(self.path().join("list-layers.json"), json).unwrap();
        self
    }

    pub fn with_list_layer_versions(self, json: &str) -> Self {
        fs::write(self.path().join("list-layer-versions.json"), json).unwrap();
        self
    }

    /// The zip the fake AWS CLI received on publish
    pub fn published_zip(&self) -> PathBuf {
        self.path().join("published.zip")
    }

    /// Every AWS CLI invocation, one line each
    pub fn aws_calls(&self) -> Vec<String> {
        fs::read_to_string(self.path().join("aws.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn aws_called_with(&self, needle: &str) -> bool {
        self.aws_calls().iter().any(|call| call.contains(needle))
    }

    /// A `layergen` command wired to the fake tools and an empty config
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("layergen").unwrap();
        cmd.env("LAYERGEN_AWS", self.path().join("aws"))
            .env("LAYERGEN_PIP", self.path().join("pip"))
            .env("LAYERGEN_NPM", self.path().join("npm"))
            .env("LAYERGEN_CONFIG_DIR", self.config_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("LAYERGEN_REGION")
            .env_remove("AWS_REGION")
            .env_remove("AWS_DEFAULT_REGION")
            .env_remove("AWS_PROFILE")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn write_script(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn aws_script(dir: &Path) -> String {
    let dir = dir.display();
    format!(
        r#"#!/bin/sh
DIR="{dir}"
echo "$*" >> "$DIR/aws.log"

prev=""
version=""
zip=""
layer=""
for arg in "$@"; do
  case "$prev" in
    --version-number) version="$arg" ;;
    --zip-file) zip="${{arg#fileb://}}" ;;
    --layer-name) layer="$arg" ;;
  esac
  prev="$arg"
done

case "$*" in
  *"sts get-caller-identity"*)
    echo '{IDENTITY}'
    ;;
  *"configure get region"*)
    if [ -f "$DIR/region.txt" ]; then cat "$DIR/region.txt"; else exit 1; fi
    ;;
  *"lambda list-layers"*)
    if [ -f "$DIR/list-layers.json" ]; then cat "$DIR/list-layers.json"; else echo '{{"Layers": []}}'; fi
    ;;
  *"lambda list-layer-versions"*)
    if [ -f "$DIR/list-layer-versions.json" ]; then cat "$DIR/list-layer-versions.json"; else echo '{{"LayerVersions": []}}'; fi
    ;;
  *"lambda get-layer-version"*)
    if [ -f "$DIR/versions.txt" ] && grep -qx "$version" "$DIR/versions.txt"; then
      echo "{{\"LayerVersionArn\": \"arn:aws:lambda:us-east-1:123456789012:layer:$layer:$version\", \"Version\": $version}}"
    else
      echo "An error occurred (ResourceNotFoundException) when calling the GetLayerVersion operation: The resource you requested does not exist." >&2
      exit 254
    fi
    ;;
  *"lambda publish-layer-version"*)
    cp "$zip" "$DIR/published.zip" || exit 1
    echo "{{\"LayerVersionArn\": \"arn:aws:lambda:us-east-1:123456789012:layer:$layer:1\", \"Version\": 1, \"CreatedDate\": \"2024-05-01T12:00:00.000+0000\", \"CompatibleRuntimes\": []}}"
    ;;
  *"lambda delete-layer-version"*)
    ;;
  *)
    echo "fake aws: unexpected call: $*" >&2
    exit 2
    ;;
esac
"#
    )
}

fn pip_script(install: InstallBehavior) -> String {
    let body = match install {
        InstallBehavior::Succeed => {
            r#"mkdir -p "$target/requests" && echo "__version__ = '2.31.0'" > "$target/requests/__init__.py""#
        },
        InstallBehavior::InstallNothing => "true",
        InstallBehavior::Fail => {
            r#"echo "ERROR: No matching distribution found for requestz" >&2; exit 1"#
        },
        InstallBehavior::DanglingSymlink => {
            r#"mkdir -p "$target/pkg" && echo "" > "$target/pkg/__init__.py" && ln -s "$target/pkg/gone.py" "$target/pkg/broken.py""#
        },
    };

    format!(
        r#"#!/bin/sh
prev=""
target=""
for arg in "$@"; do
  if [ "$prev" = "--target" ]; then target="$arg"; fi
  if [ "$prev" = "-r" ] && [ ! -f "$arg" ]; then echo "ERROR: Could not open requirements file" >&2; exit 1; fi
  prev="$arg"
done
{body}
"#
    )
}

fn npm_script(install: InstallBehavior) -> String {
    let body = match install {
        InstallBehavior::Succeed => {
            r#"mkdir -p "$prefix/node_modules/lodash" && echo "module.exports = {}" > "$prefix/node_modules/lodash/index.js""#
        },
        InstallBehavior::InstallNothing => "true",
        InstallBehavior::Fail => r#"echo "npm ERR! 404 Not Found" >&2; exit 1"#,
        InstallBehavior::DanglingSymlink => {
            r#"mkdir -p "$prefix/node_modules/.bin" && ln -s ../missing/cli.js "$prefix/node_modules/.bin/missing""#
        },
    };

    format!(
        r#"#!/bin/sh
prev=""
prefix=""
for arg in "$@"; do
  if [ "$prev" = "--prefix" ]; then prefix="$arg"; fi
  prev="$arg"
done
{body}
"#
    )
}

/// Count table rows that carry a layer ARN
pub fn arn_rows(stdout: &[u8]) -> usize {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| line.contains("arn:aws:lambda:"))
        .count()
}
