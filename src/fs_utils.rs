use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use crate::constants::{FILENAME_TIMESTAMP_FORMAT, IMAGE_EXTENSION, IMAGE_PREFIX};
use crate::error::AppError;
use crate::vault::{normalize_vault_path, Vault};

/// `ai_image_YYYYMMDD_HHMMSS.png` for the given local time.
pub fn generate_filename(now: DateTime<Local>) -> String {
    format!(
        "{IMAGE_PREFIX}{}.{IMAGE_EXTENSION}",
        now.format(FILENAME_TIMESTAMP_FORMAT)
    )
}

/// Embed link for a saved image. Only the base name is used, so the link
/// resolves wherever the vault keeps the file.
pub fn image_link(image_path: &str) -> String {
    let file_name = image_path
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(image_path);
    format!("![[{file_name}]]")
}

pub fn join_vault_path(folder: &str, file_name: &str) -> String {
    normalize_vault_path(&format!("{folder}/{file_name}"))
}

/// Returns `original` if free inside `folder`, else the first `stem-N.ext`
/// that is.
pub async fn ensure_unique_file_name<V: Vault>(
    vault: &V,
    folder: &str,
    original: &str,
) -> Result<String, AppError> {
    if !vault.exists(&join_vault_path(folder, original)).await? {
        return Ok(original.to_string());
    }

    let original_path = Path::new(original);
    let stem = original_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let extension = original_path.extension().and_then(|ext| ext.to_str());

    let mut counter = 1;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{stem}-{counter}.{ext}"),
            None => format!("{stem}-{counter}"),
        };

        if !vault.exists(&join_vault_path(folder, &candidate)).await? {
            return Ok(candidate);
        }

        counter += 1;
    }
}

/// Writes `data` as a new timestamped image inside `save_location`, creating the
/// folder if needed, and returns the vault path.
pub async fn save_image<V: Vault>(
    vault: &V,
    data: &[u8],
    save_location: &str,
    now: DateTime<Local>,
) -> Result<String, AppError> {
    let folder = normalize_vault_path(save_location);
    vault.create_folder_if_missing(&folder).await?;

    let file_name = ensure_unique_file_name(vault, &folder, &generate_filename(now)).await?;
    let image_path = join_vault_path(&folder, &file_name);

    vault.write_binary_file(&image_path, data).await?;
    info!(path = %image_path, bytes = data.len(), "saved generated image");

    Ok(image_path)
}
