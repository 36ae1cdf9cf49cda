use thiserror::Error;

use bcd_core::error::CoreError;

use crate::page::Page;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("that field is on page {} ({}), current page is {} ({})", .field_page.number(), .field_page.title(), .current.number(), .current.title())]
    FieldNotOnPage { field_page: Page, current: Page },

    #[error("submit is only available on the summary page")]
    NotOnSummaryPage,

    #[error(transparent)]
    Core(#[from] CoreError),
}
