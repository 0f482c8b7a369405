//! Small extracted site shared by the integration tests

use docs_mdx_migrator::PageRecord;
use docs_mdx_migrator::store::{crawler_stem, write_json};
use std::path::Path;

pub const BASE: &str = "https://docs.payper.ca";

pub fn site() -> Vec<PageRecord> {
    vec![
        PageRecord::new(
            "Getting Started",
            format!("{}/docs/getting-started", BASE),
            "<title>Getting Started</title><h1>Getting Started</h1>\
             <p>Create an account. Request API keys. Send a test payment.</p>\
             <p>Note: sandbox keys expire after 30 days.</p>",
        ),
        PageRecord::new(
            "E-Transfer Payment Guide",
            format!("{}/docs/e-transfer-payment", BASE),
            "<h1>E-Transfer Payments</h1><p>Collect funds by e-Transfer.</p>\
             <pre><code class=\"language-bash\">curl -X POST https://api.payper.ca/v1/payments</code></pre>",
        ),
        PageRecord::new(
            "Digital Cheque Transaction",
            format!("{}/docs/digital-cheque-transaction", BASE),
            "<h1>Digital Cheque</h1><ul><li>Create</li><li>Deposit</li></ul>",
        ),
        PageRecord::new(
            "API Reference",
            format!("{}/reference/api", BASE),
            "<h1>API Reference</h1><table><tr><th>Method</th><th>Path</th></tr>\
             <tr><td>POST</td><td>/v1/payments</td></tr></table>",
        ),
        PageRecord::new(
            "Webhooks",
            format!("{}/docs/webhooks", BASE),
            "<h1>Webhooks</h1><p>Warning: verify every signature.</p>",
        ),
    ]
}

/// Write each record under the name the extractor gives it
pub fn write_site(dir: &Path, pages: &[PageRecord]) {
    for page in pages {
        let path = dir.join(format!("{}.json", crawler_stem(&page.url)));
        write_json(path, page).expect("write page record");
    }
}
