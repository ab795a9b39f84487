use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

pub static DEFAULT_HOST: &str = "127.0.0.1";
pub static CONF_FILE_NAME: &str = "bitcoin.conf";
pub static COOKIE_FILE_NAME: &str = ".cookie";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("cookie file {0} is not in `user:password` form")]
    MalformedCookie(PathBuf),
    #[error("both an RPC user and an RPC password are needed, only the {0} was given")]
    IncompleteCredentials(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Main,
    Test,
    Testnet4,
    Signet,
    Regtest,
}

impl Network {
    pub fn rpc_port(self) -> u16 {
        match self {
            Network::Main => 8332,
            Network::Test => 18332,
            Network::Testnet4 => 48332,
            Network::Signet => 38332,
            Network::Regtest => 18443,
        }
    }

    /*
     * Subdirectory of the data dir the node uses for this network
     */
    pub fn data_subdir(self) -> Option<&'static str> {
        match self {
            Network::Main => None,
            Network::Test => Some("testnet3"),
            Network::Testnet4 => Some("testnet4"),
            Network::Signet => Some("signet"),
            Network::Regtest => Some("regtest"),
        }
    }

    /// Name of the network as used by `chain=` and `[section]` headers.
    pub fn name(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Testnet4 => "testnet4",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "main" => Some(Network::Main),
            "test" => Some(Network::Test),
            "testnet4" => Some(Network::Testnet4),
            "signet" => Some(Network::Signet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RpcAuth {
    UserPass { user: String, password: String },
    Cookie(PathBuf),
}

impl RpcAuth {
    /*
     * Resolve the user and password, reading the cookie file if needed
     */
    pub fn credentials(&self) -> Result<(String, String), ConfigError> {
        match self {
            RpcAuth::UserPass { user, password } => Ok((user.clone(), password.clone())),
            RpcAuth::Cookie(path) => {
                let cookie = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let (user, password) = cookie
                    .trim_end()
                    .split_once(':')
                    .ok_or_else(|| ConfigError::MalformedCookie(path.clone()))?;
                Ok((user.to_string(), password.to_string()))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub host: String,
    pub port: u16,
    pub auth: RpcAuth,
    pub network: Network,
    pub datadir: PathBuf,
    pub timeout: Option<Duration>,
}

/*
 * Platform default data directory of Bitcoin Core
 */
pub fn default_datadir() -> Option<PathBuf> {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        dirs::data_dir().map(|dir| dir.join("Bitcoin"))
    } else {
        dirs::home_dir().map(|dir| dir.join(".bitcoin"))
    }
}

fn network_dir(datadir: &Path, network: Network) -> PathBuf {
    match network.data_subdir() {
        Some(subdir) => datadir.join(subdir),
        None => datadir.to_path_buf(),
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn is_enabled(value: &str) -> bool {
    !matches!(value.trim(), "" | "0")
}

impl Configuration {
    pub fn new() -> Self {
        Self::with_datadir(default_datadir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn with_datadir(datadir: impl Into<PathBuf>) -> Self {
        let datadir = datadir.into();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: Network::Main.rpc_port(),
            auth: RpcAuth::Cookie(datadir.join(COOKIE_FILE_NAME)),
            network: Network::Main,
            datadir,
            timeout: None,
        }
    }

    /*
     * Read `bitcoin.conf` from the data dir, or from `conf` when given.
     * A missing default file just means defaults, a missing explicit one is an error.
     */
    pub fn load(datadir: Option<PathBuf>, conf: Option<PathBuf>) -> Result<Self, ConfigError> {
        let datadir = datadir
            .or_else(default_datadir)
            .unwrap_or_else(|| PathBuf::from("."));

        let (conf_path, explicit) = match conf {
            Some(conf) => (conf, true),
            None => (datadir.join(CONF_FILE_NAME), false),
        };

        match fs::read_to_string(&conf_path) {
            Ok(contents) => {
                tracing::debug!("Loaded node configuration from {}", conf_path.display());
                Self::from_conf_str(&contents, datadir)
            }
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No configuration at {}, using defaults",
                    conf_path.display()
                );
                Ok(Self::with_datadir(datadir))
            }
            Err(source) => Err(ConfigError::Io {
                path: conf_path,
                source,
            }),
        }
    }

    /*
     * Parse the contents of a `bitcoin.conf` file.
     * Values inside the `[section]` of the selected network win over top level ones.
     */
    pub fn from_conf_str(contents: &str, datadir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        let mut section: Option<String> = None;

        for line in contents.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_string());
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.push((section.clone(), key.trim().to_string(), value.trim().to_string()));
            }
        }

        let top_level = |key: &str| {
            entries
                .iter()
                .filter(|(section, k, _)| section.is_none() && k == key)
                .map(|(_, _, value)| value.clone())
                .last()
        };

        let enabled = |key: &str| top_level(key).map_or(false, |value| is_enabled(&value));

        let network = if let Some(chain) = top_level("chain") {
            Network::from_name(&chain).ok_or(ConfigError::InvalidValue {
                key: "chain".to_string(),
                value: chain,
            })?
        } else if enabled("regtest") {
            Network::Regtest
        } else if enabled("signet") {
            Network::Signet
        } else if enabled("testnet4") {
            Network::Testnet4
        } else if enabled("testnet") {
            Network::Test
        } else {
            Network::Main
        };

        let value = |key: &str| {
            entries
                .iter()
                .filter(|(section, k, _)| {
                    k == key && section.as_deref().map_or(true, |s| s == network.name())
                })
                // Sectioned values sort after top level ones
                .max_by_key(|(section, _, _)| section.is_some())
                .map(|(_, _, value)| value.clone())
        };

        let datadir = datadir.into();
        let netdir = network_dir(&datadir, network);

        let mut config = Self::with_datadir(datadir);
        config.network = network;
        config.port = network.rpc_port();
        config.auth = RpcAuth::Cookie(netdir.join(COOKIE_FILE_NAME));

        if let Some(connect) = value("rpcconnect") {
            config.set_connect(&connect)?;
        }

        if let Some(port) = value("rpcport") {
            config.port = parse_port("rpcport", &port)?;
        }

        if let Some(cookie) = value("rpccookiefile") {
            config.auth = RpcAuth::Cookie(netdir.join(cookie));
        }

        config.override_credentials(value("rpcuser"), value("rpcpassword"))?;

        Ok(config)
    }

    /*
     * Apply `RPC_HOST`, `RPC_PORT`, `RPC_USER` and `RPC_PASSWORD` from a dotenv style file
     */
    pub fn apply_env_file(&mut self, contents: &str) -> Result<(), ConfigError> {
        let mut user = None;
        let mut password = None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), unquote(value.trim())),
                None => continue,
            };

            match key {
                "RPC_HOST" => self.host = value.to_string(),
                "RPC_PORT" => self.port = parse_port(key, value)?,
                "RPC_USER" => user = Some(value.to_string()),
                "RPC_PASSWORD" => password = Some(value.to_string()),
                _ => {}
            }
        }

        self.override_credentials(user, password)
    }

    /*
     * Set the host from an `rpcconnect` style value: `host`, `host:port`,
     * a bare IPv6 address or `[ipv6]:port`
     */
    pub fn set_connect(&mut self, connect: &str) -> Result<(), ConfigError> {
        let connect = connect.trim();

        if let Some(rest) = connect.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(|| ConfigError::InvalidValue {
                key: "rpcconnect".to_string(),
                value: connect.to_string(),
            })?;
            match tail.strip_prefix(':') {
                Some(port) => self.port = parse_port("rpcconnect", port)?,
                None if tail.is_empty() => {}
                None => {
                    return Err(ConfigError::InvalidValue {
                        key: "rpcconnect".to_string(),
                        value: connect.to_string(),
                    })
                }
            }
            self.host = host.to_string();
            return Ok(());
        }

        match connect.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => {
                self.host = host.to_string();
                self.port = parse_port("rpcconnect", port)?;
            }
            _ => self.host = connect.to_string(),
        }

        Ok(())
    }

    /*
     * Replace the user and password. A lone user or password only completes
     * credentials that are already set by name, never a cookie.
     */
    pub fn override_credentials(
        &mut self,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<(), ConfigError> {
        let (current_user, current_password) = match &self.auth {
            RpcAuth::UserPass { user, password } => (Some(user.clone()), Some(password.clone())),
            RpcAuth::Cookie(_) => (None, None),
        };

        match (user, password) {
            (None, None) => Ok(()),
            (user, password) => {
                let user = user
                    .or(current_user)
                    .ok_or(ConfigError::IncompleteCredentials("password"))?;
                let password = password
                    .or(current_password)
                    .ok_or(ConfigError::IncompleteCredentials("user"))?;
                self.auth = RpcAuth::UserPass { user, password };
                Ok(())
            }
        }
    }

    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}/", self.host, self.port)
        } else {
            format!("http://{}:{}/", self.host, self.port)
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
