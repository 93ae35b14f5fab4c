//! Form field names accepted by the HTTP operations

pub const TEMPLATE: &str = "template";
pub const DATA: &str = "data";
pub const ATTACHMENT: &str = "attachment";

pub const ACROBAT_VERSION: &str = "renderOptions.acrobatVersion";
pub const CACHE_STRATEGY: &str = "renderOptions.cacheStrategy";
pub const CONTENT_ROOT: &str = "renderOptions.contentRoot";
pub const DEBUG_DIR: &str = "renderOptions.debugDir";
pub const RENDER_LOCALE: &str = "renderOptions.locale";
pub const SUBMIT_URL: &str = "renderOptions.submitUrl";
pub const TAGGED_PDF: &str = "renderOptions.taggedPdf";
pub const XCI: &str = "renderOptions.xci";

/// Document-of-record locale field
pub const DOR_LOCALE: &str = "locale";

/// Fields read by `POST /render-pdf-form`, in validation order.
pub const RENDER_PDF_FORM: &[&str] = &[
    TEMPLATE,
    DATA,
    ACROBAT_VERSION,
    CACHE_STRATEGY,
    CONTENT_ROOT,
    DEBUG_DIR,
    RENDER_LOCALE,
    SUBMIT_URL,
    TAGGED_PDF,
    XCI,
    ATTACHMENT,
];

/// Fields read by `POST /document-of-record`, in validation order.
pub const DOCUMENT_OF_RECORD: &[&str] = &[TEMPLATE, DATA, DOR_LOCALE, ATTACHMENT];
