//! Interaction protocol for the coreceptor prediction form.
//!
//! The page layout is owned by the website: every control this tool touches
//! is addressed by a fixed XPath in [`Locators`], and a markup change on
//! their side is repaired by editing that table. There is no retry and no
//! drift detection; a lookup that never resolves fails the run.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::{Element, Page};
use tokio::time::{sleep, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// XPath addresses of the form controls and the results container.
#[derive(Debug, Clone)]
pub struct Locators {
    /// The required entry of the species/subtype dropdown.
    pub subtype_option: String,
    pub sequence_field: String,
    pub action_button: String,
    /// Second table under the main container, rendered after a submission.
    pub results_table: String,
    pub new_input_button: String,
    pub identifier_field: String,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            subtype_option: r#"//*[@id="g2pmain"]/div/center/table/tbody/tr[5]/td/select/option[8]"#
                .into(),
            sequence_field: r#"//*[@id="g2pmain"]/div/center/table/tbody/tr[8]/td/textarea"#.into(),
            action_button: r#"//*[@id="XactionCell"]/input"#.into(),
            results_table: r#"//*[@id="g2pmain"]/div/table[2]"#.into(),
            new_input_button: r#"//*[@id="g2pmain"]/table/tbody/tr/td[2]/input"#.into(),
            identifier_field: r#"//*[@id="g2pmain"]/div/center/table/tbody/tr[1]/td/input"#.into(),
        }
    }
}

/// What the batch loop needs from the website: paste a FASTA blob and get
/// the rendered result text back, then put the form back into its input
/// state for the next batch.
#[allow(async_fn_in_trait)]
pub trait SubmissionForm {
    async fn submit(&self, fasta_text: &str) -> Result<String>;
    async fn reset(&self) -> Result<()>;
}

/// Live driver for the geno2pheno form on an already-navigated page.
pub struct Geno2PhenoForm {
    page: Page,
    locators: Locators,
    results_timeout: Duration,
}

impl Geno2PhenoForm {
    pub fn new(page: Page, results_timeout: Duration) -> Self {
        Self {
            page,
            locators: Locators::default(),
            results_timeout,
        }
    }

    pub fn with_locators(mut self, locators: Locators) -> Self {
        self.locators = locators;
        self
    }

    /// Poll for an element until it appears or `timeout` passes.
    async fn wait_for(&self, xpath: &str, timeout: Duration) -> Result<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.page.find_xpath(xpath).await {
                Ok(element) => return Ok(element),
                Err(_) if Instant::now() < deadline => sleep(POLL_INTERVAL).await,
                Err(e) => return Err(e).with_context(|| format!("element not found: {xpath}")),
            }
        }
    }

    async fn find(&self, xpath: &str) -> Result<Element> {
        self.wait_for(xpath, ELEMENT_TIMEOUT).await
    }

    async fn clear_field(&self, xpath: &str) -> Result<()> {
        self.find(xpath)
            .await?
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .with_context(|| format!("failed to clear field: {xpath}"))?;
        Ok(())
    }
}

impl SubmissionForm for Geno2PhenoForm {
    async fn submit(&self, fasta_text: &str) -> Result<String> {
        debug!(bytes = fasta_text.len(), "filling submission form");

        self.find(&self.locators.subtype_option)
            .await?
            .click()
            .await
            .context("failed to select the subtype option")?;

        let field = self.find(&self.locators.sequence_field).await?;
        field
            .click()
            .await
            .context("failed to focus the sequence field")?;
        field
            .type_str(fasta_text)
            .await
            .context("failed to enter the sequences")?;

        self.find(&self.locators.action_button)
            .await?
            .click()
            .await
            .context("failed to trigger the prediction")?;

        let table = self
            .wait_for(&self.locators.results_table, self.results_timeout)
            .await
            .context("result table never rendered")?;
        let text = table
            .inner_text()
            .await
            .context("failed to read the result table")?
            .ok_or_else(|| anyhow!("result table rendered empty"))?;

        debug!(lines = text.lines().count(), "result table captured");
        Ok(text)
    }

    async fn reset(&self) -> Result<()> {
        self.find(&self.locators.new_input_button)
            .await?
            .click()
            .await
            .context("failed to request a new input form")?;
        self.clear_field(&self.locators.identifier_field).await?;
        self.clear_field(&self.locators.sequence_field).await?;
        Ok(())
    }
}
