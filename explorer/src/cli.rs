use std::{
    fs,
    path::PathBuf,
    time::Duration,
};

use argh::FromArgs;
use blockchain::{
    ConfigError,
    Configuration,
};

/// Print the ten most recent blocks of a Bitcoin Core node.
#[derive(Debug, Default, FromArgs)]
pub struct Cli {
    /// node data directory, defaults to the platform's Bitcoin Core directory
    #[argh(option)]
    pub datadir: Option<PathBuf>,

    /// node configuration file, defaults to bitcoin.conf in the data directory
    #[argh(option)]
    pub conf: Option<PathBuf>,

    /// file with RPC_HOST, RPC_PORT, RPC_USER and RPC_PASSWORD lines
    #[argh(option)]
    pub env_file: Option<PathBuf>,

    /// RPC host, optionally with a port (`host:port`, `[ipv6]:port`)
    #[argh(option)]
    pub rpcconnect: Option<String>,

    /// RPC port
    #[argh(option)]
    pub rpcport: Option<u16>,

    /// RPC user, paired with the password from the flags, env file or bitcoin.conf
    #[argh(option)]
    pub rpcuser: Option<String>,

    /// RPC password, paired with the user from the flags, env file or bitcoin.conf
    #[argh(option)]
    pub rpcpassword: Option<String>,

    /// seconds to wait for each RPC call, 0 or unset for no limit
    #[argh(option)]
    pub timeout: Option<u64>,

    /// print difficulty and block interval summaries after the blocks
    #[argh(switch)]
    pub analyze: bool,

    /// print the node's mining info before the blocks
    #[argh(switch)]
    pub info: bool,

    /// print a summary of the node's current block template before the blocks
    #[argh(switch)]
    pub template: bool,

    /// print the network hashrate over the last 10, 120 and 2016 blocks and
    /// the current difficulty before the blocks
    #[argh(switch)]
    pub hashrate: bool,
}

impl Cli {
    /*
     * Flags win over the env file, which wins over bitcoin.conf
     */
    pub fn configuration(&self) -> Result<Configuration, ConfigError> {
        let mut config = Configuration::load(self.datadir.clone(), self.conf.clone())?;

        if let Some(path) = &self.env_file {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            config.apply_env_file(&contents)?;
        }

        if let Some(connect) = &self.rpcconnect {
            config.set_connect(connect)?;
        }
        if let Some(port) = self.rpcport {
            config.port = port;
        }
        config.override_credentials(self.rpcuser.clone(), self.rpcpassword.clone())?;

        // 0 means no limit, as with bitcoin-cli's -rpcclienttimeout
        config.timeout = self
            .timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(config)
    }
}
