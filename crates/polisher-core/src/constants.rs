//! Route and filesystem layout constants shared by the pipeline and the storage setup.

/// Router prefix of the upload demo pages.
pub const UPLOAD_DEMO_PREFIX: &str = "/upload-demo";

/// Route segment under which the local object storage serves stored files.
pub const LOCAL_OBJECT_STORAGE_ROUTE: &str = "/local-object-storage";

/// Multipart field carrying the uploaded audio demo.
pub const AUDIO_DEMO_FIELD: &str = "audio_demo_file";

/// Logical prefix for uploaded demo objects.
pub const DEMOS_PREFIX: &str = "demos";

/// Directory (relative to the storage base dir) that receives separated stems.
pub const SEPARATED_DIR: &str = "demos/separated";

/// Kv key prefix for upload records.
pub const UPLOAD_RECORD_KEY_PREFIX: &str = "upload_record";
