//! edit コマンドのテスト（スタブのエディタを使用）

use photo_magic::edit::{edit_image, EditRequest};
use photo_magic::error::PhotoMagicError;
use photo_magic_common::{encode_bytes, EncodedImage, Error, ImageEditor};
use std::cell::RefCell;
use std::path::Path;
use tempfile::tempdir;

const INPUT_BYTES: &[u8] = b"\x89PNG fake input";
const OUTPUT_BYTES: &[u8] = b"\x89PNG fake output";

/// 受け取った画像を記録し、固定の応答を返す
struct StubEditor {
    response: Result<String, String>,
    received: RefCell<Vec<(EncodedImage, String)>>,
}

impl StubEditor {
    fn returning(bytes: &[u8]) -> Self {
        Self {
            response: Ok(encode_bytes(bytes, "image/png").data),
            received: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            received: RefCell::new(Vec::new()),
        }
    }
}

impl ImageEditor for StubEditor {
    async fn edit(&self, image: &EncodedImage, instruction: &str) -> photo_magic_common::Result<String> {
        self.received.borrow_mut().push((image.clone(), instruction.to_string()));
        self.response.clone().map_err(Error::Remote)
    }
}

fn request(dir: &Path, input: &str, instruction: &str) -> EditRequest {
    EditRequest {
        input: dir.join(input),
        instruction: instruction.to_string(),
        output: dir.join("out").join("edited-image.png"),
        show_progress: false,
    }
}

#[tokio::test]
async fn test_edit_writes_decoded_result() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("cat.jpg"), INPUT_BYTES).unwrap();
    let editor = StubEditor::returning(OUTPUT_BYTES);

    let report = edit_image(&editor, &request(dir.path(), "cat.jpg", "add a hat"))
        .await
        .unwrap();

    assert_eq!(report.bytes_written, OUTPUT_BYTES.len());
    assert_eq!(report.source_mime_type, "image/jpeg");
    assert_eq!(std::fs::read(&report.output).unwrap(), OUTPUT_BYTES);

    let received = editor.received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0, encode_bytes(INPUT_BYTES, "image/jpeg"));
    assert_eq!(received[0].1, "add a hat");
}

#[tokio::test]
async fn test_edit_failure_message_is_verbatim() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("cat.png"), INPUT_BYTES).unwrap();
    let editor = StubEditor::failing("quota exceeded");

    let req = request(dir.path(), "cat.png", "add a hat");
    let err = edit_image(&editor, &req).await.unwrap_err();

    assert!(matches!(&err, PhotoMagicError::Edit(m) if m == "quota exceeded"));
    assert!(!req.output.exists());
}

/// 空白だけの指示は送信しない
#[tokio::test]
async fn test_blank_instruction_is_rejected_without_request() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("cat.png"), INPUT_BYTES).unwrap();
    let editor = StubEditor::returning(OUTPUT_BYTES);

    let err = edit_image(&editor, &request(dir.path(), "cat.png", "   "))
        .await
        .unwrap_err();

    assert!(matches!(err, PhotoMagicError::Validation(_)));
    assert!(editor.received.borrow().is_empty());
}

/// 読み込み失敗はエディタを呼ばずにメッセージを返す
#[tokio::test]
async fn test_unreadable_input_skips_editor() {
    let dir = tempdir().expect("Failed to create temp dir");
    let editor = StubEditor::returning(OUTPUT_BYTES);

    let req = request(dir.path(), "missing.webp", "add a hat");
    let err = edit_image(&editor, &req).await.unwrap_err();

    let io_message = std::fs::read(&req.input).unwrap_err().to_string();
    assert!(matches!(&err, PhotoMagicError::Edit(m) if *m == io_message));
    assert!(editor.received.borrow().is_empty());
}

/// 空の応答は「画像が返らなかった」扱い
#[tokio::test]
async fn test_empty_payload_is_no_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("cat.png"), INPUT_BYTES).unwrap();
    let editor = StubEditor::returning(b"");

    let err = edit_image(&editor, &request(dir.path(), "cat.png", "add a hat"))
        .await
        .unwrap_err();

    assert!(matches!(&err, PhotoMagicError::Edit(m) if m.starts_with("The model did not return an image")));
}
