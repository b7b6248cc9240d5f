use shipyard_core::SlugConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Top-level entries never streamed into the slug builder.
const SLUG_EXCLUDES: &[&str] = &[".git", "build", "target", "infrastructure", "node_modules"];

/// Directory, relative to the project, that receives the slug and its Dockerfile.
pub const SLUG_DIR: &str = "target";

/// Turns a working tree into a docker build context.
#[allow(async_fn_in_trait)]
pub trait SlugBuilder: Send + Sync {
    /// Build the slug and return the build directory, relative to `project_dir`.
    async fn build_slug(&self, project_dir: &Path, docker_opts: &str)
    -> Result<PathBuf, SlugError>;
}

/// Streams `tar` of the working tree into the slug builder image.
///
/// ```text
/// tar -cf - <entries> | docker run ... <builder_image> - > target/slug.tgz
/// cp <slug dockerfile> target/Dockerfile
/// ```
pub struct DockerSlugBuilder {
    config: SlugConfig,
}

impl DockerSlugBuilder {
    pub fn new(config: SlugConfig) -> Self {
        Self { config }
    }

    fn docker_args(&self, docker_opts: &str) -> Result<Vec<String>, SlugError> {
        let cache = self.config.cache_dir.display();
        let mut args: Vec<String> = [
            "run",
            "-v",
            &format!("{cache}:{cache}:rw"),
            "--rm",
            "-i",
            "-a",
            "stdin",
            "-a",
            "stdout",
            "-a",
            "stderr",
        ]
        .iter()
        .map(|s| (*s).to_owned())
        .collect();
        args.extend(split_opts(docker_opts)?);
        args.push(self.config.builder_image.clone());
        args.push("-".to_owned());
        Ok(args)
    }
}

impl SlugBuilder for DockerSlugBuilder {
    async fn build_slug(
        &self,
        project_dir: &Path,
        docker_opts: &str,
    ) -> Result<PathBuf, SlugError> {
        let entries = slug_entries(project_dir)?;
        let docker_args = self.docker_args(docker_opts)?;
        let slug_dir = project_dir.join(SLUG_DIR);
        std::fs::create_dir_all(&slug_dir).map_err(|e| SlugError::Create {
            path: slug_dir.clone(),
            source: e,
        })?;

        let slug_path = slug_dir.join("slug.tgz");
        let slug_file = std::fs::File::create(&slug_path).map_err(|e| SlugError::Create {
            path: slug_path.clone(),
            source: e,
        })?;

        tracing::info!(entries = entries.len(), image = %self.config.builder_image, "building slug");

        let mut tar = tokio::process::Command::new("tar")
            .arg("-cf")
            .arg("-")
            .args(&entries)
            .current_dir(project_dir)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SlugError::Spawn {
                program: "tar",
                source: e,
            })?;

        let tar_stdout: Result<Stdio, SlugError> = match tar.stdout.take() {
            Some(stdout) => stdout.try_into().map_err(|e| SlugError::Spawn {
                program: "tar",
                source: e,
            }),
            None => Err(SlugError::Pipe),
        };
        let docker_status = match tar_stdout {
            Ok(stdin) => tokio::process::Command::new("docker")
                .args(&docker_args)
                .current_dir(project_dir)
                .stdin(stdin)
                .stdout(Stdio::from(slug_file))
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(|e| SlugError::Spawn {
                    program: "docker",
                    source: e,
                }),
            Err(e) => Err(e),
        };

        // Reap tar even when docker never started; the pipe is closed by now.
        let tar_status = tar.wait().await.map_err(|e| SlugError::Spawn {
            program: "tar",
            source: e,
        });
        let docker_status = docker_status?;
        let tar_status = tar_status?;

        if !tar_status.success() {
            return Err(SlugError::Failed {
                program: "tar",
                detail: format!("exit code: {tar_status}"),
            });
        }
        if !docker_status.success() {
            return Err(SlugError::Failed {
                program: "docker",
                detail: format!("{docker_args:?} exit code: {docker_status}"),
            });
        }

        let dockerfile = slug_dir.join("Dockerfile");
        std::fs::copy(&self.config.dockerfile, &dockerfile).map_err(|e| {
            SlugError::StageDockerfile {
                from: self.config.dockerfile.clone(),
                source: e,
            }
        })?;

        Ok(PathBuf::from(SLUG_DIR))
    }
}

/// Split slug builder docker options into words. Single and double quotes
/// group words and a backslash outside single quotes escapes the next
/// character. Variable expansion and other shell syntax are not supported.
fn split_opts(opts: &str) -> Result<Vec<String>, SlugError> {
    let malformed = || SlugError::DockerOpts {
        opts: opts.to_owned(),
    };
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = opts.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => word.push(c),
            (_, '\\') => {
                word.push(chars.next().ok_or_else(malformed)?);
                in_word = true;
            }
            (Some(_), _) => word.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, _) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, _) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(malformed());
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

/// Top-level names in `project_dir` that go into the slug, sorted.
pub fn slug_entries(project_dir: &Path) -> Result<Vec<String>, SlugError> {
    let read_dir = std::fs::read_dir(project_dir).map_err(|e| SlugError::ReadDir {
        path: project_dir.to_path_buf(),
        source: e,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| SlugError::ReadDir {
            path: project_dir.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !SLUG_EXCLUDES.contains(&name.as_str()) {
            entries.push(name);
        }
    }
    entries.sort();
    Ok(entries)
}

#[derive(Debug, thiserror::Error)]
pub enum SlugError {
    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to run {program}")]
    Spawn {
        program: &'static str,
        source: std::io::Error,
    },
    #[error("unbalanced quote or trailing backslash in docker options: {opts}")]
    DockerOpts { opts: String },
    #[error("tar produced no output pipe")]
    Pipe,
    #[error("{program} failed: {detail}")]
    Failed {
        program: &'static str,
        detail: String,
    },
    #[error("failed to stage slug Dockerfile from {from}")]
    StageDockerfile {
        from: PathBuf,
        source: std::io::Error,
    },
}
