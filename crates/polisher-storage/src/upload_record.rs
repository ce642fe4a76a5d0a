use crate::kv::{Kv, KvError};
use async_trait::async_trait;
use polisher_core::constants::UPLOAD_RECORD_KEY_PREFIX;
use polisher_core::UploadRecord;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for [`UploadRecord`]s
#[async_trait]
pub trait UploadRecordRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, KvError>;

    async fn put(&self, record: &UploadRecord) -> Result<(), KvError>;

    async fn zap(&self, id: Uuid) -> Result<bool, KvError>;
}

/// Stores upload records as JSON under `upload_record:{id}`
#[derive(Clone)]
pub struct KvUploadRecordRepository {
    kv: Arc<dyn Kv>,
}

impl KvUploadRecordRepository {
    pub fn new(kv: Arc<dyn Kv>) -> Self {
        Self { kv }
    }

    fn key(id: Uuid) -> String {
        format!("{}:{}", UPLOAD_RECORD_KEY_PREFIX, id)
    }
}

#[async_trait]
impl UploadRecordRepository for KvUploadRecordRepository {
    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, KvError> {
        match self.kv.get(&Self::key(id)).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, record: &UploadRecord) -> Result<(), KvError> {
        let key = Self::key(record.id);
        let value = serde_json::to_value(record)?;
        if !self.kv.put(&key, value).await {
            return Err(KvError::PutRejected(key));
        }
        Ok(())
    }

    async fn zap(&self, id: Uuid) -> Result<bool, KvError> {
        Ok(self.kv.zap(&Self::key(id)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::DictKv;
    use serde_json::Value;

    struct ReadOnlyKv;

    #[async_trait]
    impl Kv for ReadOnlyKv {
        async fn get(&self, _key: &str) -> Option<Value> {
            None
        }

        async fn put(&self, _key: &str, _value: Value) -> bool {
            false
        }

        async fn zap(&self, _key: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_record_round_trip_through_kv() {
        let kv = Arc::new(DictKv::new());
        let repository = KvUploadRecordRepository::new(kv.clone());

        let record = UploadRecord::new(
            "song.wav",
            "http://localhost:8000/upload-demo/local-object-storage/demos/song.wav",
        );
        repository.put(&record).await.unwrap();

        let key = format!("upload_record:{}", record.id);
        assert!(kv.get(&key).await.is_some());
        assert_eq!(repository.get(record.id).await.unwrap(), Some(record.clone()));

        assert!(repository.zap(record.id).await.unwrap());
        assert_eq!(repository.get(record.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_serialization_error() {
        let kv = Arc::new(DictKv::new());
        let repository = KvUploadRecordRepository::new(kv.clone());
        let id = Uuid::new_v4();

        kv.put(&format!("upload_record:{}", id), serde_json::json!("not a record"))
            .await;

        let result = repository.get(id).await;
        assert!(matches!(result, Err(KvError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_rejected_write_is_an_error() {
        let repository = KvUploadRecordRepository::new(Arc::new(ReadOnlyKv));
        let record = UploadRecord::new("song.wav", "file:///tmp/demos/song.wav");

        let result = repository.put(&record).await;
        assert!(matches!(
            result,
            Err(KvError::PutRejected(key)) if key.ends_with(&record.id.to_string())
        ));
    }
}
