use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Parses `name=path` pairs given to `organize --source`.
pub(crate) fn parse_source(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{raw}'"))?;
    let name = name.trim();
    let path = path.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{raw}'"));
    }
    Ok((name.to_lowercase(), PathBuf::from(path)))
}

/// Later duplicates of a source name are ignored, like folder discovery does.
pub(crate) fn source_map(sources: Vec<(String, PathBuf)>) -> BTreeMap<String, PathBuf> {
    let mut map = BTreeMap::new();
    for (name, path) in sources {
        map.entry(name).or_insert(path);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_pairs() {
        let (name, path) = parse_source("Cabedelo=/tmp/fotos cabedelo").expect("valid pair");
        assert_eq!(name, "cabedelo");
        assert_eq!(path, PathBuf::from("/tmp/fotos cabedelo"));
        assert!(parse_source("cabedelo").is_err());
        assert!(parse_source("=/tmp").is_err());
    }

    #[test]
    fn first_source_with_a_name_wins() {
        let map = source_map(vec![
            ("paraiba".to_string(), PathBuf::from("a")),
            ("paraiba".to_string(), PathBuf::from("b")),
        ]);
        assert_eq!(map["paraiba"], PathBuf::from("a"));
    }
}
