use crate::domain::{MirrorEncoding, MirrorValue};
use crate::error::Error;
use crate::ports::outbound::CwdMirror;

/// 環境変数に CWD を書くミラー（既定は PWD。シェルと子プロセスが参照する）
///
/// 環境変数はプロセス全体で共有される。書き込みは CWD マネージャのロック内からのみ行う。
#[derive(Debug, Clone)]
pub struct EnvVarMirror {
    key: String,
}

impl EnvVarMirror {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn pwd() -> Self {
        Self::new("PWD")
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CwdMirror for EnvVarMirror {
    fn name(&self) -> String {
        format!("env:{}", self.key)
    }

    fn encoding(&self) -> MirrorEncoding {
        MirrorEncoding::Text
    }

    fn probe(&self) -> Result<(), Error> {
        if self.key.is_empty() || self.key.contains('=') || self.key.contains('\0') {
            return Err(Error::construction(format!(
                "environment variable name '{}' is not writable",
                self.key
            )));
        }
        Ok(())
    }

    fn update(&self, value: &MirrorValue) -> Result<(), Error> {
        let MirrorValue::Text(text) = value else {
            return Err(Error::mirror_update(
                self.name(),
                format!("incompatible encoding: {}", value.encoding().as_str()),
            ));
        };
        if text.contains('\0') {
            return Err(Error::mirror_update(self.name(), "value contains NUL byte"));
        }
        std::env::set_var(&self.key, text);
        Ok(())
    }

    fn read_back(&self) -> Result<String, Error> {
        std::env::var(&self.key)
            .map_err(|e| Error::mirror_update(self.name(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_read_back() {
        let m = EnvVarMirror::new("CWDSYNC_TEST_ENV_MIRROR_RW");
        assert!(m.probe().is_ok());
        m.update(&MirrorValue::Text("/srv/data".to_string())).unwrap();
        assert_eq!(m.read_back().unwrap(), "/srv/data");
        assert_eq!(m.name(), "env:CWDSYNC_TEST_ENV_MIRROR_RW");
    }

    #[test]
    fn test_rejects_bytes() {
        let m = EnvVarMirror::new("CWDSYNC_TEST_ENV_MIRROR_BYTES");
        let err = m.update(&MirrorValue::Bytes(b"/srv".to_vec())).unwrap_err();
        assert!(matches!(err, Error::MirrorUpdate { .. }));
    }

    #[test]
    fn test_probe_rejects_bad_names() {
        assert!(matches!(
            EnvVarMirror::new("A=B").probe(),
            Err(Error::Construction(_))
        ));
        assert!(EnvVarMirror::new("").probe().is_err());
    }
}
