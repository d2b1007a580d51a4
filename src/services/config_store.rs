// src/services/config_store.rs
use crate::models::{ConfigPatch, QrConfig};

/// Something that must see every configuration the store publishes.
pub trait ConfigObserver: Send {
    fn config_changed(&mut self, config: &QrConfig);
}

pub struct ConfigStore {
    current: QrConfig,
    revision: u64,
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl ConfigStore {
    pub fn new(initial: QrConfig) -> Self {
        Self {
            current: initial,
            revision: 0,
            observers: Vec::new(),
        }
    }

    pub fn current(&self) -> &QrConfig {
        &self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers an observer and immediately hands it the current value.
    pub fn subscribe(&mut self, mut observer: Box<dyn ConfigObserver>) {
        observer.config_changed(&self.current);
        self.observers.push(observer);
    }

    /// Builds a new configuration from the current one plus `patch` and
    /// publishes it. No validation happens here.
    pub fn update(&mut self, patch: ConfigPatch) -> &QrConfig {
        let next = merge(&self.current, patch);
        self.replace(next)
    }

    pub fn replace(&mut self, config: QrConfig) -> &QrConfig {
        self.current = config;
        self.revision += 1;
        for observer in self.observers.iter_mut() {
            observer.config_changed(&self.current);
        }
        &self.current
    }
}

fn merge(base: &QrConfig, patch: ConfigPatch) -> QrConfig {
    let base = base.clone();
    QrConfig {
        content: patch.content.unwrap_or(base.content),
        foreground_color: patch.foreground_color.unwrap_or(base.foreground_color),
        background_color: patch.background_color.unwrap_or(base.background_color),
        error_correction_level: patch
            .error_correction_level
            .unwrap_or(base.error_correction_level),
        target_size: patch.target_size.unwrap_or(base.target_size),
        include_quiet_margin: patch
            .include_quiet_margin
            .unwrap_or(base.include_quiet_margin),
        dot_shape: patch.dot_shape.unwrap_or(base.dot_shape),
        corner_square_shape: patch.corner_square_shape.unwrap_or(base.corner_square_shape),
        corner_dot_shape: patch.corner_dot_shape.unwrap_or(base.corner_dot_shape),
        corner_square_color: patch.corner_square_color.unwrap_or(base.corner_square_color),
        corner_dot_color: patch.corner_dot_color.unwrap_or(base.corner_dot_color),
        logo_image: patch.logo_image.unwrap_or(base.logo_image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DotType, ErrorCorrectionLevel};
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<QrConfig>>>);

    impl ConfigObserver for Recorder {
        fn config_changed(&mut self, config: &QrConfig) {
            self.0.lock().unwrap().push(config.clone());
        }
    }

    #[test]
    fn single_field_update_keeps_the_rest() {
        let mut store = ConfigStore::new(QrConfig::default());
        let before = store.current().clone();

        store.update(ConfigPatch {
            dot_shape: Some(DotType::Dots),
            ..ConfigPatch::default()
        });

        let after = store.current();
        assert_eq!(after.dot_shape, DotType::Dots);
        assert_eq!(
            QrConfig {
                dot_shape: before.dot_shape,
                ..after.clone()
            },
            before
        );
    }

    #[test]
    fn every_field_can_be_patched_alone() {
        let patches = vec![
            ConfigPatch {
                content: Some("hello".into()),
                ..Default::default()
            },
            ConfigPatch {
                foreground_color: Some("#123456".into()),
                ..Default::default()
            },
            ConfigPatch {
                background_color: Some("#abcdef".into()),
                ..Default::default()
            },
            ConfigPatch {
                error_correction_level: Some(ErrorCorrectionLevel::Low),
                ..Default::default()
            },
            ConfigPatch {
                target_size: Some(1024),
                ..Default::default()
            },
            ConfigPatch {
                include_quiet_margin: Some(false),
                ..Default::default()
            },
            ConfigPatch {
                corner_square_color: Some("#ff0000".into()),
                ..Default::default()
            },
            ConfigPatch {
                corner_dot_color: Some("#00ff00".into()),
                ..Default::default()
            },
            ConfigPatch {
                logo_image: Some(Some("data:image/png;base64,AA==".into())),
                ..Default::default()
            },
        ];

        for patch in patches {
            let mut store = ConfigStore::new(QrConfig::default());
            let before = serde_json::to_value(store.current()).unwrap();
            let after = serde_json::to_value(store.update(patch.clone())).unwrap();

            let changed: Vec<_> = before
                .as_object()
                .unwrap()
                .iter()
                .filter(|(key, value)| after[key.as_str()] != **value)
                .map(|(key, _)| key.clone())
                .collect();
            assert_eq!(changed.len(), 1, "patch {:?} changed {:?}", patch, changed);
        }
    }

    #[test]
    fn null_logo_clears_it() {
        let mut store = ConfigStore::new(QrConfig {
            logo_image: Some("data:image/png;base64,AA==".into()),
            ..QrConfig::default()
        });
        store.update(ConfigPatch {
            logo_image: Some(None),
            ..ConfigPatch::default()
        });
        assert_eq!(store.current().logo_image, None);
    }

    #[test]
    fn observers_see_initial_value_and_each_update() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = ConfigStore::new(QrConfig::default());
        store.subscribe(Box::new(Recorder(seen.clone())));

        store.update(ConfigPatch {
            content: Some("one".into()),
            ..ConfigPatch::default()
        });
        store.update(ConfigPatch {
            content: Some("two".into()),
            ..ConfigPatch::default()
        });

        let seen = seen.lock().unwrap();
        let contents: Vec<_> = seen.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["https://qrstudiopro.app", "one", "two"]);
        assert_eq!(store.revision(), 2);
    }
}
