//! # Localization Module
//!
//! Fluent message bundles for every user-facing string. Resources are
//! compiled into the binary so lookups never depend on the working directory.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

pub const FALLBACK_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("ru", include_str!("../locales/ru/main.ftl")),
];

/// Localization manager holding one bundle per supported language
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager with all embedded languages loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = code.parse()?;
            bundles.insert(code.to_string(), Self::create_bundle(locale, source)?);
        }

        Ok(Self { bundles })
    }

    fn create_bundle(
        locale: LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Arguments are user input; render them without bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid resource for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Whether a bundle exists for the given language code
    pub fn supports(&self, language: &str) -> bool {
        self.bundles.contains_key(&primary_subtag(language))
    }

    /// Get a localized message, falling back to English for unknown languages
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(&primary_subtag(language))
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match bundle.get_message(key).and_then(|msg| msg.value()) {
            Some(pattern) => pattern,
            None => return format!("Missing translation: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, language, errors = ?errors, "Message formatted with errors");
        }

        value.into_owned()
    }
}

/// Reduce `en-US` / `ru_RU` style tags to their lowercase primary subtag
fn primary_subtag(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().expect("embedded locale resources must parse")
});

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Pick the user's language when supported, otherwise the configured default
pub fn pick_language<'a>(user_language: Option<&'a str>, default_language: &'a str) -> &'a str {
    match user_language {
        Some(lang) if get_localization_manager().supports(lang) => lang,
        _ => default_language,
    }
}

/// Get a localized message in the given language
pub fn t_lang(key: &str, language: &str) -> String {
    get_localization_manager().get_message_in_language(key, language, None)
}

/// Get a localized message with arguments in the given language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language: &str) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(key, language, Some(&args_map))
}
