#[cfg(test)]
mod tests {
    use crate::config::{Config, EnvKeys, LLMConfig, LLMProvider, PipelineConfig};
    use crate::error::ConfigError;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn configured() -> Config {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[
            (EnvKeys::SERPER_API_KEY, "serper-key"),
            (EnvKeys::FIRECRAWL_API_KEY, "fc-key"),
            (EnvKeys::OPENAI_API_KEY, "sk-test"),
        ]));
        config
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(config.llm.api_key.is_empty());
        assert!(config.search.api_key.is_empty());
        assert!(config.scrape.api_key.is_empty());
        assert_eq!(config.search.endpoint, "https://google.serper.dev/search");
        assert_eq!(config.scrape.endpoint, "https://api.firecrawl.dev/v1");
        assert!(!config.verbose);
    }

    #[test]
    fn test_pipeline_defaults() {
        let pipeline = PipelineConfig::default();

        assert_eq!(pipeline.extract_search_limit, 3);
        assert_eq!(pipeline.extract_excerpt_chars, 1500);
        assert_eq!(pipeline.research_candidate_limit, 4);
        assert_eq!(pipeline.fallback_search_limit, 4);
        assert_eq!(pipeline.official_site_search_limit, 1);
        assert_eq!(pipeline.analysis_content_chars, 2500);
        assert_eq!(pipeline.max_parallels, 1);
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        assert_eq!(config.provider, LLMProvider::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.1);
        assert!(!config.api_base_url.is_empty());
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("openai".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("DeepSeek".parse::<LLMProvider>().unwrap(), LLMProvider::DeepSeek);
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(" ollama ".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);

        assert!(matches!(
            "invalid".parse::<LLMProvider>(),
            Err(ConfigError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_llm_provider_display_round_trips() {
        for provider in [
            LLMProvider::OpenAI,
            LLMProvider::DeepSeek,
            LLMProvider::OpenRouter,
            LLMProvider::Anthropic,
            LLMProvider::Ollama,
        ] {
            assert_eq!(provider.to_string().parse::<LLMProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_env_overrides_fill_credentials() {
        let config = configured();

        assert_eq!(config.search.api_key, "serper-key");
        assert_eq!(config.scrape.api_key, "fc-key");
        assert_eq!(config.llm.api_key, "sk-test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dedicated_llm_key_wins_over_openai_key() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[
            (EnvKeys::OPENAI_API_KEY, "sk-openai"),
            (EnvKeys::LLM_API_KEY, "sk-dedicated"),
        ]));

        assert_eq!(config.llm.api_key, "sk-dedicated");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.scrape.api_key = "from-file".to_string();
        config.apply_env_overrides(env_of(&[(EnvKeys::FIRECRAWL_API_KEY, "   ")]));

        assert_eq!(config.scrape.api_key, "from-file");
    }

    #[test]
    fn test_missing_fetch_credential_is_fatal() {
        let mut config = configured();
        config.scrape.api_key.clear();

        match config.validate() {
            Err(ConfigError::MissingCredential { name }) => assert_eq!(name, "FIRECRAWL_API_KEY"),
            other => panic!("expected missing firecrawl key, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_search_credential_is_fatal() {
        let mut config = configured();
        config.search.api_key.clear();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { name: "SERPER_API_KEY" })
        ));
    }

    #[test]
    fn test_ollama_needs_no_llm_key() {
        let mut config = configured();
        config.llm.api_key.clear();
        assert!(config.validate().is_err());

        config.llm.provider = LLMProvider::Ollama;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_parallels_rejected() {
        let mut config = configured();
        config.pipeline.max_parallels = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "pipeline.max_parallels", .. })
        ));
    }

    #[test]
    fn test_config_from_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("patent-scout.toml");
        std::fs::write(
            &path,
            r#"
verbose = true

[llm]
provider = "deepseek"
model = "deepseek-chat"

[pipeline]
max_parallels = 4
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.llm.temperature, 0.1);
        assert_eq!(config.pipeline.max_parallels, 4);
        assert_eq!(config.pipeline.research_candidate_limit, 4);
        assert_eq!(config.scrape.timeout_seconds, 120);
    }

    #[test]
    fn test_config_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(&temp_dir.path().join("nope.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[llm\nprovider = ").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_serialized_config_hides_credentials() {
        let config = configured();
        let text = toml::to_string(&config).unwrap();

        assert!(!text.contains("fc-key"));
        assert!(!text.contains("serper-key"));
        assert!(!text.contains("sk-test"));
    }
}
