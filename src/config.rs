use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    constants::{
        DEFAULT_TIMEOUT_MS, GRADER_JAR_NAME, JAR_ENV, TIMEOUT_ENV, TOOL_ENV, WORK_DIR_ENV,
        WORK_DIR_NAME,
    },
    core::transcript::Markup,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {msg}")]
    Read { path: PathBuf, msg: String },
    #[error("failed to parse config {path}: {msg}")]
    Parse { path: PathBuf, msg: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },
    #[error("failed to determine working directory: {msg}")]
    WorkingDir { msg: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Result<Self, ConfigError> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Result<Self, ConfigError> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(ConfigError::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    /// Location of the bundled Java runtime below the runtime root.
    pub fn java_path(self) -> &'static str {
        match self {
            Platform::Windows => "jdk/windows/bin/java.exe",
            Platform::MacOs => "jdk/macos_arm/bin/java",
            Platform::Linux => "jdk/linux_x64/bin/java",
        }
    }
}

/// External tool invocation: `<program> [-jar <jar>] <compile unit>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub jar: Option<PathBuf>,
}

impl ToolCommand {
    pub fn args(&self, unit_path: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(3);
        if let Some(jar) = &self.jar {
            args.push(OsString::from("-jar"));
            args.push(jar.as_os_str().to_owned());
        }
        args.push(unit_path.as_os_str().to_owned());
        args
    }

    pub fn display(&self, unit_path: &Path) -> String {
        match &self.jar {
            Some(jar) => format!(
                "{} -jar \"{}\" \"{}\"",
                self.program.display(),
                jar.display(),
                unit_path.display()
            ),
            None => format!("{} \"{}\"", self.program.display(), unit_path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    /// Directory holding the bundled `jdk/` trees and the grader jar.
    pub runtime_root: PathBuf,
    /// Explicit tool binary; skips platform resolution.
    pub tool: Option<PathBuf>,
    /// Jar passed with `-jar`. Defaults to the bundled one unless `tool` is
    /// overridden.
    pub jar: Option<PathBuf>,
    pub timeout_ms: u64,
    /// Parent of the per-request compile unit directories.
    pub work_dir: PathBuf,
    pub markup: Markup,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            runtime_root: PathBuf::from("assets"),
            tool: None,
            jar: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            work_dir: std::env::temp_dir().join(WORK_DIR_NAME),
            markup: Markup::default(),
        }
    }
}

impl GraderConfig {
    /// Defaults, then the optional TOML file, then `CODEGRADER_*` variables.
    /// Relative paths are anchored at the current working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let cwd = std::env::current_dir().map_err(|e| ConfigError::WorkingDir {
            msg: e.to_string(),
        })?;
        Ok(config
            .with_env(|key| std::env::var(key).ok())?
            .relative_to(&cwd))
    }

    /// Joins every relative path onto `base`. A bare tool name such as `java`
    /// stays as is so it is looked up on `PATH`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.runtime_root = base.join(&self.runtime_root);
        self.work_dir = base.join(&self.work_dir);
        self.jar = self.jar.map(|jar| base.join(jar));
        self.tool = self.tool.map(|tool| {
            if tool.components().count() > 1 {
                base.join(tool)
            } else {
                tool
            }
        });
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })
    }

    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tool) = lookup(TOOL_ENV) {
            self.tool = Some(PathBuf::from(tool));
        }
        if let Some(jar) = lookup(JAR_ENV) {
            self.jar = Some(PathBuf::from(jar));
        }
        if let Some(work_dir) = lookup(WORK_DIR_ENV) {
            self.work_dir = PathBuf::from(work_dir);
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            self.timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: TIMEOUT_ENV.to_string(),
                    value: timeout.clone(),
                })?;
        }
        Ok(self)
    }

    pub fn tool_command(&self) -> Result<ToolCommand, ConfigError> {
        self.tool_command_for(Platform::current())
    }

    fn tool_command_for(
        &self,
        platform: Result<Platform, ConfigError>,
    ) -> Result<ToolCommand, ConfigError> {
        match &self.tool {
            Some(program) => Ok(ToolCommand {
                program: program.clone(),
                jar: self.jar.clone(),
            }),
            None => {
                let platform = platform?;
                Ok(ToolCommand {
                    program: self.runtime_root.join(platform.java_path()),
                    jar: Some(
                        self.jar
                            .clone()
                            .unwrap_or_else(|| self.runtime_root.join(GRADER_JAR_NAME)),
                    ),
                })
            }
        }
    }
}
