//! ブラウザで選択された画像ファイル
//!
//! プレビューはObject URL、送信時はFileReaderでData URLとして読み込み、
//! Base64部分を取り出す。

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gloo::file::ObjectUrl;
use photo_magic_common::{split_data_url, EncodedImage, Error, ImageSource, Result};
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader};

use crate::js_error::js_message;

const READ_FAILED: &str = "The selected file could not be read.";

#[derive(Clone)]
pub struct BrowserImage {
    file: File,
    file_name: String,
    mime_type: String,
    preview: Rc<ObjectUrl>,
}

impl BrowserImage {
    pub fn new(file: File) -> Self {
        let file_name = file.name();
        let mime_type = file.type_();
        let blob = gloo::file::Blob::from(web_sys::Blob::from(file.clone()));
        let preview = Rc::new(ObjectUrl::from(blob));
        Self {
            file,
            file_name,
            mime_type,
            preview,
        }
    }

    /// 元画像表示用のObject URL（このハンドルが破棄されると失効）
    pub fn preview_url(&self) -> &str {
        &self.preview
    }
}

impl ImageSource for BrowserImage {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn encode(&self) -> Result<EncodedImage> {
        let data_url = read_as_data_url(&self.file).await?;
        let encoded = split_data_url(&data_url).ok_or_else(|| Error::Read(READ_FAILED.to_string()))?;

        // 宣言されたMIMEタイプを優先（空の場合のみData URL側を使う）
        let mime_type = if self.mime_type.is_empty() {
            encoded.mime_type
        } else {
            self.mime_type.clone()
        };
        Ok(EncodedImage::new(encoded.data, mime_type))
    }
}

async fn read_as_data_url(file: &File) -> Result<String> {
    let reader = FileReader::new().map_err(|e| Error::Read(js_message(&e)))?;
    let (tx, rx) = oneshot::channel::<std::result::Result<String, String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let reader = reader.clone();
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            let result = reader
                .result()
                .ok()
                .and_then(|value| value.as_string())
                .ok_or_else(|| READ_FAILED.to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }) as Box<dyn FnMut(_)>)
    };

    let onerror = {
        let reader = reader.clone();
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            let message = reader
                .error()
                .map(|e| e.message())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| READ_FAILED.to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(message));
            }
        }) as Box<dyn FnMut(_)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| Error::Read(js_message(&e)))?;

    let result = rx
        .await
        .map_err(|_| Error::Read(READ_FAILED.to_string()))?;

    reader.set_onload(None);
    reader.set_onerror(None);
    drop(onload);
    drop(onerror);

    result.map_err(Error::Read)
}
