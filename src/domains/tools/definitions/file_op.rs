//! File operation tool definition.
//!
//! One tool, nine operations, all bounded by the configured sandbox root:
//! delete, rename, read and write (plain text or .docx), directory listing,
//! JSON<->XLSX conversion, image compression, and OCR of a local image via
//! the upstream endpoint.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::Config;
use crate::core::security::resolve_sandbox_path;
use crate::domains::sandbox::{SandboxError, docx, imaging, spreadsheet};
use crate::domains::tools::error::{ToolFailure, map_io_error, success_result};
use crate::domains::upstream::{ApiEnvelope, OcrData, UpstreamClient, is_quota_exhausted};

const OCR_SERVICE: &str = "Text extraction";

/// Maximum input size accepted by the OCR endpoint.
const OCR_MAX_BYTES: u64 = 2 * 1024 * 1024;

// ============================================================================
// Tool Parameters
// ============================================================================

/// The operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum FileOperation {
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "rename")]
    Rename,
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "write")]
    Write,
    #[serde(rename = "list")]
    List,
    #[serde(rename = "json2xlsx")]
    Json2Xlsx,
    #[serde(rename = "xlsx2json")]
    Xlsx2Json,
    #[serde(rename = "compressImage")]
    CompressImage,
    #[serde(rename = "ocrToImageBase64")]
    OcrToImageBase64,
}

/// Write mode for the write operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Append,
    #[default]
    Overwrite,
}

fn default_quality() -> u8 {
    80
}

/// Parameters for the file operation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileOperationParams {
    /// Operation to perform.
    #[schemars(
        description = "Operation: delete/rename/read/write/list/json2xlsx/xlsx2json/compressImage/ocrToImageBase64"
    )]
    pub operation: FileOperation,

    /// File to operate on, relative to the sandbox root. For json2xlsx this
    /// is the .xlsx file to create.
    #[schemars(description = "Filename relative to the sandbox root")]
    pub filename: String,

    /// New filename for rename (and optional target for xlsx2json).
    /// Word files end in .docx, Excel files in .xlsx.
    #[serde(rename = "newFilename", default)]
    pub new_filename: Option<String>,

    /// Content to write (write and json2xlsx operations).
    #[serde(default)]
    pub content: Option<String>,

    /// Write mode: append or overwrite (default overwrite).
    #[serde(default)]
    pub mode: WriteMode,

    /// List only plain, non-hidden files (default false).
    #[serde(rename = "onlyFiles", default)]
    pub only_files: bool,

    /// Compression quality, 1-100 (default 80).
    #[serde(default = "default_quality")]
    #[schemars(range(min = 1, max = 100))]
    pub quality: u8,

    /// Output filename for compressImage; defaults to the input name with
    /// `_compressed` appended before the extension.
    #[serde(default)]
    pub output: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// File operation tool.
pub struct FileOperationTool;

impl FileOperationTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "fileOperation";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Operate on files inside the configured sandbox directory: delete, rename, \
         read and write (plain text or .docx), list, convert JSON to/from .xlsx, \
         compress images (jpg/jpeg/png/gif), or extract text from an image via OCR.";

    /// Execute the tool logic.
    pub async fn execute(
        params: &FileOperationParams,
        config: &Config,
        upstream: &UpstreamClient,
    ) -> CallToolResult {
        info!(
            "File operation {:?} called for: {}",
            params.operation, params.filename
        );

        let Some(root) = config.sandbox.root.as_deref() else {
            warn!("File operation refused: sandbox root not configured");
            return ToolFailure::MissingSandboxRoot.into_result();
        };

        if !(1..=100).contains(&params.quality) {
            return ToolFailure::precondition("quality must be between 1 and 100.").into_result();
        }

        let path = match resolve_sandbox_path(root, &params.filename) {
            Ok(p) => p,
            Err(e) => {
                warn!("Sandbox path rejected: {}", e);
                return ToolFailure::precondition(e.to_string()).into_result();
            }
        };

        let outcome = match params.operation {
            FileOperation::Delete => Self::delete(root, &path, &params.filename),
            FileOperation::Rename => Self::rename(root, &path, params),
            FileOperation::Read => Self::read(root, &path, &params.filename),
            FileOperation::Write => Self::write(root, &path, params),
            FileOperation::List => Self::list(root, params.only_files),
            FileOperation::Json2Xlsx => Self::json_to_xlsx(root, &path, params),
            FileOperation::Xlsx2Json => Self::xlsx_to_json(root, &path, params),
            FileOperation::CompressImage => Self::compress_image(root, &path, params),
            FileOperation::OcrToImageBase64 => {
                Self::ocr_image(root, &path, params, config, upstream).await
            }
        };

        match outcome {
            Ok(text) => success_result(text),
            Err(failure) => {
                warn!("File operation failed: {}", failure);
                failure.into_result()
            }
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    fn delete(root: &Path, path: &Path, filename: &str) -> Result<String, ToolFailure> {
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "File {} does not exist.",
                filename
            )));
        }
        fs::remove_file(path).map_err(|e| map_io_error(e, root, "Failed to delete file"))?;
        Ok(format!("File {} has been deleted.", filename))
    }

    fn rename(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
    ) -> Result<String, ToolFailure> {
        let Some(new_name) = params.new_filename.as_deref() else {
            return Err(ToolFailure::precondition(
                "Rename requires the new name of the file.",
            ));
        };
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "File {} does not exist.",
                params.filename
            )));
        }
        let new_path = resolve_sandbox_path(root, new_name)
            .map_err(|e| ToolFailure::precondition(e.to_string()))?;
        fs::rename(path, &new_path).map_err(|e| map_io_error(e, root, "Failed to rename file"))?;
        Ok(format!(
            "File {} has been renamed to {}.",
            params.filename, new_name
        ))
    }

    fn read(root: &Path, path: &Path, filename: &str) -> Result<String, ToolFailure> {
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "File {} does not exist.",
                filename
            )));
        }
        let text = if has_extension(filename, &["docx"]) {
            docx::read_docx_text(path).map_err(|e| lift(e, root, "Failed to read docx file"))?
        } else {
            fs::read_to_string(path).map_err(|e| map_io_error(e, root, "Failed to read file"))?
        };
        Ok(format!("{} content:\n{}", filename, text))
    }

    fn write(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
    ) -> Result<String, ToolFailure> {
        let Some(content) = params.content.as_deref() else {
            return Err(ToolFailure::precondition(
                "Write requires the content to write.",
            ));
        };

        let verb = match params.mode {
            WriteMode::Append => "appended to",
            WriteMode::Overwrite => "written to",
        };

        if has_extension(&params.filename, &["docx"]) {
            let text = if params.mode == WriteMode::Append && path.exists() {
                let existing =
                    docx::read_docx_text(path).map_err(|e| lift(e, root, "Failed to read docx file"))?;
                existing + content
            } else {
                content.to_string()
            };
            docx::write_docx_text(path, &text)
                .map_err(|e| lift(e, root, "Failed to write docx file"))?;
            Ok(format!(
                "Content has been {} docx file {}.",
                verb, params.filename
            ))
        } else {
            match params.mode {
                WriteMode::Append => {
                    let mut file = fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(|e| map_io_error(e, root, "Failed to open file"))?;
                    file.write_all(content.as_bytes())
                        .map_err(|e| map_io_error(e, root, "Failed to write file"))?;
                }
                WriteMode::Overwrite => {
                    fs::write(path, content)
                        .map_err(|e| map_io_error(e, root, "Failed to write file"))?;
                }
            }
            Ok(format!(
                "Content has been {} file {}.",
                verb, params.filename
            ))
        }
    }

    fn list(root: &Path, only_files: bool) -> Result<String, ToolFailure> {
        let entries =
            fs::read_dir(root).map_err(|e| map_io_error(e, root, "Failed to list directory"))?;

        let mut lines = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let name = entry.file_name().to_string_lossy().to_string();

            let metadata = entry.metadata();
            if only_files {
                let is_plain_file = metadata.as_ref().map(|m| m.is_file()).unwrap_or(false);
                if !is_plain_file || name.starts_with('.') {
                    continue;
                }
            }

            let annotated = match metadata {
                Ok(m) if m.is_file() => {
                    format!("{} ({:.2}KB)", name, m.len() as f64 / 1024.0)
                }
                Ok(_) => format!("{} (DIR)", name),
                Err(_) => format!("{} (unknown)", name),
            };
            lines.push(annotated);
        }
        lines.sort();

        Ok(format!(
            "Files in the sandbox directory:\n{}",
            lines.join("\n")
        ))
    }

    fn json_to_xlsx(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
    ) -> Result<String, ToolFailure> {
        let Some(content) = params.content.as_deref() else {
            return Err(ToolFailure::precondition(
                "json2xlsx requires a JSON string as content.",
            ));
        };

        let records: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(content).map_err(|_| {
                ToolFailure::precondition("The provided content is not a valid JSON array of records.")
            })?;

        spreadsheet::json_to_xlsx(&records, path)
            .map_err(|e| lift(e, root, "Failed to save xlsx file"))?;
        Ok(format!(
            "JSON data has been saved as xlsx file: {}",
            params.filename
        ))
    }

    fn xlsx_to_json(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
    ) -> Result<String, ToolFailure> {
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "File {} does not exist.",
                params.filename
            )));
        }

        let records = spreadsheet::xlsx_to_json(path)
            .map_err(|e| lift(e, root, "Failed to read xlsx file"))?;

        let target = match params.new_filename.as_deref() {
            Some(new_name) => resolve_sandbox_path(root, new_name)
                .map_err(|e| ToolFailure::precondition(e.to_string()))?,
            None => path.with_extension("json"),
        };

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| ToolFailure::library(format!("Failed to serialize records: {}", e)))?;
        fs::write(&target, json).map_err(|e| map_io_error(e, root, "Failed to write JSON file"))?;

        Ok(format!(
            "{} content has been saved as JSON file: {}",
            params.filename,
            file_name(&target)
        ))
    }

    fn compress_image(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
    ) -> Result<String, ToolFailure> {
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "Image file {} does not exist.",
                params.filename
            )));
        }
        if !has_extension(&params.filename, &["jpg", "jpeg", "png", "gif"]) {
            return Err(ToolFailure::precondition(
                "Only jpg, jpeg, png and gif images can be compressed.",
            ));
        }

        let dest = match params.output.as_deref() {
            Some(output) => resolve_sandbox_path(root, output)
                .map_err(|e| ToolFailure::precondition(e.to_string()))?,
            None => compressed_output_path(path),
        };

        if has_extension(&params.filename, &["gif"]) {
            imaging::compress_gif(path, &dest, params.quality)
                .map_err(|e| lift(e, root, "Failed to compress GIF image"))?;
            Ok(format!(
                "GIF image compressed and saved as: {}",
                file_name(&dest)
            ))
        } else {
            let format = if has_extension(&params.filename, &["png"]) {
                imaging::RasterFormat::Png
            } else {
                imaging::RasterFormat::Jpeg
            };
            imaging::compress_raster(path, &dest, format, params.quality)
                .map_err(|e| lift(e, root, "Failed to compress image"))?;
            Ok(format!(
                "Image compressed and saved as: {}",
                file_name(&dest)
            ))
        }
    }

    async fn ocr_image(
        root: &Path,
        path: &Path,
        params: &FileOperationParams,
        config: &Config,
        upstream: &UpstreamClient,
    ) -> Result<String, ToolFailure> {
        let Some((app_key, uid)) = config.credentials.pair() else {
            return Err(ToolFailure::MissingCredentials);
        };
        if !path.exists() {
            return Err(ToolFailure::precondition(format!(
                "Image file {} does not exist.",
                params.filename
            )));
        }

        let metadata =
            fs::metadata(path).map_err(|e| map_io_error(e, root, "Failed to read image file"))?;
        if metadata.len() > OCR_MAX_BYTES {
            return Err(ToolFailure::precondition(
                "Image file is too large, the limit is 2MB.",
            ));
        }

        let media_type = if has_extension(&params.filename, &["jpg", "jpeg"]) {
            "image/jpeg"
        } else if has_extension(&params.filename, &["png"]) {
            "image/png"
        } else {
            return Err(ToolFailure::precondition(
                "Only jpg, jpeg and png images are supported.",
            ));
        };

        let bytes =
            fs::read(path).map_err(|e| map_io_error(e, root, "Failed to read image file"))?;
        let data_url = format!("data:{};base64,{}", media_type, BASE64.encode(bytes));

        let envelope = upstream.image_ocr(&data_url, app_key, uid).await;
        Self::render_ocr(&params.filename, envelope)
    }

    /// Turn the OCR response into the caller-visible text, or a failure.
    pub fn render_ocr(
        filename: &str,
        envelope: Option<ApiEnvelope<OcrData>>,
    ) -> Result<String, ToolFailure> {
        let Some(envelope) = envelope else {
            return Err(ToolFailure::Unreachable(OCR_SERVICE));
        };

        if is_quota_exhausted(envelope.code) {
            return Err(ToolFailure::QuotaExhausted(OCR_SERVICE));
        }

        if envelope.code != 0 {
            return Err(ToolFailure::Upstream {
                service: OCR_SERVICE,
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        let content = envelope.data.unwrap_or_default().content;
        if content.is_empty() {
            return Err(ToolFailure::precondition(format!(
                "Text extraction from {} returned no content.",
                filename
            )));
        }

        Ok(format!("Text extracted from {}:\n{}", filename, content))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<FileOperationParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the stdio transport.
    pub fn create_route<S>(config: Arc<Config>, upstream: Arc<UpstreamClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            let upstream = upstream.clone();
            async move {
                let params: FileOperationParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config, &upstream).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Case-insensitive extension check.
fn has_extension(filename: &str, extensions: &[&str]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// `photo.jpg` -> `photo_compressed.jpg`
fn compressed_output_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_compressed.{}", stem, ext),
        None => format!("{}_compressed", stem),
    };
    path.with_file_name(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Map a sandbox adapter error into the tool failure taxonomy.
fn lift(err: SandboxError, root: &Path, context: &str) -> ToolFailure {
    match err {
        SandboxError::Io(e) => map_io_error(e, root, context),
        SandboxError::Other(msg) => ToolFailure::library(msg),
    }
}

// ============================================================================
// Tests
// ============================================================================
