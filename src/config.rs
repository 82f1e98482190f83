use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;
use log::LevelFilter;

use crate::cf::clamp_how_many;
use crate::config_processors::Unquote;
use crate::io::UserId;

// Set some default values
const DEFAULT_TARGET_USER: UserId = 1;
const DEFAULT_NUM_ITEMS_TO_RECOMMEND: i64 = 3;
const DEFAULT_NUM_ITEMS_TO_EVALUATE: i64 = 10;
const DEFAULT_EVALUATION_OUT_PATH: &str = "evaluation.csv";

pub struct AppConfig {
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
}

pub struct LogConfig {
    pub level: String,
}

pub struct DataConfig {
    /// Tab separated ratings file, the built-in sample ratings are used when absent.
    pub ratings_path: Option<String>,
}

pub struct ModelConfig {
    pub target_user: UserId,
    pub num_items_to_recommend: usize,
}

pub struct EvaluationConfig {
    pub num_items_to_recommend: usize,
    pub save_records: bool,
    pub out_path: String,
}

impl AppConfig {
    pub fn new(config_path: String) -> anyhow::Result<AppConfig> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path).map_err(|e| {
                anyhow::anyhow!("Loading configuration file {} failed: {}", config_path, e)
            })?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "ratings_path"]),
                OsStr::new("RATINGS_DATA"),
            ),
            (
                ConfPath::from(&["model", "target_user"]),
                OsStr::new("TARGET_USER"),
            ),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        Ok(AppConfig::parse(conf))
    }

    fn parse(conf: Config) -> AppConfig {
        AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .value()
                .unwrap_or_default(),
        }
    }

    /// Unknown or empty levels fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::Info)
    }

    pub fn init_logger(&self) {
        let _ = env_logger::Builder::new()
            .filter(None, self.level_filter())
            .format_timestamp(None)
            .try_init();
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            ratings_path: conf
                .get(path.push("ratings_path"))
                .unquote()
                .value()
                .ok()
                .filter(|ratings_path: &String| !ratings_path.is_empty()),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            target_user: conf
                .get(path.push("target_user"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TARGET_USER),
            num_items_to_recommend: clamp_how_many(
                conf.get(path.push("num_items_to_recommend"))
                    .trim()
                    .value()
                    .unwrap_or(DEFAULT_NUM_ITEMS_TO_RECOMMEND),
            ),
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            num_items_to_recommend: clamp_how_many(
                conf.get(path.push("num_items_to_recommend"))
                    .trim()
                    .value()
                    .unwrap_or(DEFAULT_NUM_ITEMS_TO_EVALUATE),
            ),
            save_records: conf
                .get(path.push("save_records"))
                .trim()
                .value()
                .unwrap_or(false),
            out_path: conf
                .get(path.push("out_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_EVALUATION_OUT_PATH)),
        }
    }
}
