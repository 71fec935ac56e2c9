// ABOUTME: Environment overrides for template parameters.
// ABOUTME: A parameter whose key is set in the environment takes the environment value.

use std::collections::HashMap;

use super::{Parameter, ParameterSet};

/// Where override values come from.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Parameters after environment overrides were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParameters {
    pub parameters: Vec<Parameter>,
    /// Keys whose value came from the environment, in parameter order.
    pub overridden: Vec<String>,
}

/// Overlays environment values onto file parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterResolver<E = ProcessEnv> {
    env: E,
}

impl ParameterResolver<ProcessEnv> {
    pub fn from_process_env() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: EnvSource> ParameterResolver<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn resolve(&self, set: ParameterSet) -> ResolvedParameters {
        let mut resolved = ResolvedParameters::default();

        for mut parameter in set.into_vec() {
            if let Some(value) = self.env.get(&parameter.key) {
                tracing::info!(key = %parameter.key, "parameter overridden from environment");
                parameter.value = value;
                resolved.overridden.push(parameter.key.clone());
            }
            resolved.parameters.push(parameter);
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn environment_value_wins() {
        let set = ParameterSet::new(vec![Parameter::new("Env", "dev")]).unwrap();
        let resolved = ParameterResolver::new(env(&[("Env", "prod")])).resolve(set);

        assert_eq!(resolved.parameters, vec![Parameter::new("Env", "prod")]);
        assert_eq!(resolved.overridden, vec!["Env".to_string()]);
    }

    #[test]
    fn file_value_kept_without_environment() {
        let set = ParameterSet::new(vec![Parameter::new("Env", "dev")]).unwrap();
        let resolved = ParameterResolver::new(env(&[])).resolve(set);

        assert_eq!(resolved.parameters, vec![Parameter::new("Env", "dev")]);
        assert!(resolved.overridden.is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let set = ParameterSet::new(vec![
            Parameter::new("C", "3"),
            Parameter::new("A", "1"),
            Parameter::new("B", "2"),
        ])
        .unwrap();
        let resolved = ParameterResolver::new(env(&[("A", "one")])).resolve(set);

        let keys: Vec<_> = resolved.parameters.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
        assert_eq!(resolved.parameters[1].value, "one");
    }

    #[test]
    fn empty_environment_value_still_overrides() {
        let set = ParameterSet::new(vec![Parameter::new("Suffix", "-x")]).unwrap();
        let resolved = ParameterResolver::new(env(&[("Suffix", "")])).resolve(set);
        assert_eq!(resolved.parameters[0].value, "");
    }
}
