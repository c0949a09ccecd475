//! HTML rendering of search results.
//!
//! Builds the single fragment the chat UI displays when a search augments a
//! reply. Each document gets a visible block (title + snippet) and an
//! initially-hidden modal repeating the title and full body text for the
//! UI's reveal-on-click interaction. The class names are the contract with
//! the static UI assets.

use crate::ports::Document;

/// Sentence introducing the rendered documents.
const RESULTS_HEADER: &str = "Great question. I found a few ideas for you:<br>";

/// Renders the documents into one HTML fragment, preserving the order the
/// search collaborator returned them in. Embedded newlines are substituted
/// with `<br>` over the finished fragment so multi-line bodies render
/// correctly in the browser.
pub fn render_documents(documents: &[Document]) -> String {
    let mut html = String::from(RESULTS_HEADER);

    for doc in documents {
        html.push_str(&format!(
            "<div class='docContainer'>\
                <div title='View content' class='docBody'>\
                    <div class='docBodyTitle'>{title}</div>\
                    <div class='docBodySnippet'>{text}</div>\
                </div>\
                <div class='modal' hidden>\
                    <div class='modal-header'>\
                        <div class='modal-doc'>{title}</div>\
                        <span class='modal-close'>\
                            <img src='img/close-button.png' class='close-button'>\
                        </span>\
                    </div>\
                    <div class='bodyText'>{text}</div>\
                </div>\
            </div>",
            title = doc.title,
            text = doc.text,
        ));
    }

    html.replace('\n', "<br>")
}
