//! Prompt-model classification
//!
//! One prompt per run: the whole tab list (id and title, no URLs) goes to a
//! generative model primed to answer with a JSON object mapping group names
//! to arrays of tab ids. The reply is validated against that shape.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tabsort_groups::RawGroups;
use tabsort_tabs::{Tab, TabId};

use super::{download_message, BackendKind, ClassificationBackend};
use crate::classifier::DownloadProgress;
use crate::error::ClassifyError;
use crate::labels::LabelSet;
use crate::model::{Availability, LanguageModel, PromptSession};
use crate::progress::ProgressSender;
use crate::Result;

/// Group for tabs the model left out
const UNASSIGNED_GROUP: &str = "Other";

const SYSTEM_PROMPT: &str = "You organize browser tabs into groups. \
Respond with strict JSON only: a single object whose keys are group names and \
whose values are arrays of numeric tab ids. Put every tab id in exactly one \
group. Do not add explanations, comments or markdown.";

pub struct PromptModelBackend {
    model: Arc<dyn LanguageModel>,
}

impl PromptModelBackend {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    async fn ensure_ready(&self, progress: &ProgressSender) -> Result<()> {
        progress.progress("Checking language model...");

        match self.model.availability().await? {
            Availability::Unavailable => Err(ClassifyError::UnavailableBackend(
                "The on-device language model is not available".to_string(),
            )),
            Availability::Downloadable => {
                tracing::info!("Language model requires download");
                progress.progress("Downloading language model...");
                Ok(())
            }
            Availability::Ready => Ok(()),
        }
    }

    async fn run_prompt(
        &self,
        session: &mut dyn PromptSession,
        tabs: &[Tab],
        labels: &LabelSet,
        progress: &ProgressSender,
    ) -> Result<RawGroups> {
        progress.progress("Classifying tabs...");
        let reply = session.prompt(&build_prompt(tabs, labels)?).await?;
        tracing::debug!(chars = reply.len(), "Language model replied");
        parse_grouping(&reply, tabs)
    }
}

#[async_trait]
impl ClassificationBackend for PromptModelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PromptModel
    }

    async fn classify(
        &self,
        tabs: &[Tab],
        labels: &LabelSet,
        progress: &ProgressSender,
    ) -> Result<RawGroups> {
        self.ensure_ready(progress).await?;

        let on_download =
            |update: DownloadProgress| progress.progress(download_message("language model", update));
        let mut session = self
            .model
            .create_session(SYSTEM_PROMPT, &on_download)
            .await?;

        let outcome = self
            .run_prompt(session.as_mut(), tabs, labels, progress)
            .await;
        session.destroy().await;

        outcome
    }
}

#[derive(Serialize)]
struct PromptTab<'a> {
    id: TabId,
    title: &'a str,
}

fn build_prompt(tabs: &[Tab], labels: &LabelSet) -> Result<String> {
    let listing: Vec<PromptTab<'_>> = tabs
        .iter()
        .map(|tab| PromptTab {
            id: tab.id,
            title: tab.display_title(),
        })
        .collect();
    let tabs_json = serde_json::to_string_pretty(&listing)?;

    Ok(format!(
        "Group these browser tabs by topic.\n\
Prefer these group names when they fit: {labels}\n\
\n\
Tabs JSON:\n\
{tabs_json}\n\
\n\
Return ONLY a JSON object such as {{\"Work\": [1, 2], \"News\": [3]}}.",
        labels = labels.to_input(),
    ))
}

/// Remove surrounding markdown code-fence markers (with optional language
/// tag) from a model reply.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        },
        None => trimmed,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Tab id as the model wrote it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl IdValue {
    fn to_tab_id(&self) -> Result<TabId> {
        match self {
            IdValue::Int(id) => Ok(*id),
            IdValue::Float(f) if f.fract() == 0.0 => Ok(*f as TabId),
            IdValue::Float(f) => Err(ClassifyError::Parse(format!("invalid tab id {f}"))),
            IdValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ClassifyError::Parse(format!("invalid tab id {s:?}"))),
        }
    }
}

/// Parse a model reply into raw groups over `tabs`.
///
/// Ids the model invented are ignored and a tab listed twice keeps its first
/// group. Tabs the model never mentioned go to an "Other" group.
pub(crate) fn parse_grouping(reply: &str, tabs: &[Tab]) -> Result<RawGroups> {
    let payload = strip_code_fences(reply);
    let parsed: IndexMap<String, Vec<IdValue>> =
        serde_json::from_str(payload).map_err(|e| ClassifyError::Parse(e.to_string()))?;

    let by_id: HashMap<TabId, &Tab> = tabs.iter().map(|t| (t.id, t)).collect();
    let mut assigned: HashSet<TabId> = HashSet::with_capacity(tabs.len());
    let mut groups = RawGroups::new();

    for (name, ids) in &parsed {
        let name = match name.trim() {
            "" => UNASSIGNED_GROUP,
            trimmed => trimmed,
        };

        for value in ids {
            let id = value.to_tab_id()?;
            let Some(tab) = by_id.get(&id) else {
                tracing::warn!(tab_id = id, group = %name, "Model referenced an unknown tab");
                continue;
            };
            if !assigned.insert(id) {
                tracing::warn!(tab_id = id, group = %name, "Model assigned a tab twice");
                continue;
            }
            groups.assign(name, (*tab).clone());
        }
    }

    for tab in tabs.iter().filter(|t| !assigned.contains(&t.id)) {
        groups.assign(UNASSIGNED_GROUP, tab.clone());
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{progress_channel, ProgressEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tabs() -> Vec<Tab> {
        vec![
            Tab::new(1, "Mail", "https://mail.x/"),
            Tab::new(2, "Docs", "https://docs.x/"),
            Tab::new(3, "Headlines", "https://news.x/"),
        ]
    }

    fn ids(groups: &RawGroups, name: &str) -> Vec<TabId> {
        groups.get(name).unwrap().iter().map(|t| t.id).collect()
    }

    struct FakeModel {
        availability: Availability,
        reply: std::result::Result<String, String>,
        prompts: Arc<Mutex<Vec<String>>>,
        sessions: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    }

    impl FakeModel {
        fn new(availability: Availability, reply: &str) -> Self {
            Self {
                availability,
                reply: Ok(reply.to_string()),
                prompts: Arc::new(Mutex::new(Vec::new())),
                sessions: Arc::new(AtomicUsize::new(0)),
                destroyed: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct FakeSession {
        reply: std::result::Result<String, String>,
        prompts: Arc<Mutex<Vec<String>>>,
        destroyed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        async fn availability(&self) -> Result<Availability> {
            Ok(self.availability)
        }

        async fn create_session(
            &self,
            system_prompt: &str,
            on_download: &(dyn Fn(DownloadProgress) + Send + Sync),
        ) -> Result<Box<dyn PromptSession>> {
            assert!(system_prompt.contains("strict JSON"));
            if self.availability == Availability::Downloadable {
                on_download(DownloadProgress {
                    loaded: 10,
                    total: 10,
                });
            }
            self.sessions.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                reply: self.reply.clone(),
                prompts: Arc::clone(&self.prompts),
                destroyed: Arc::clone(&self.destroyed),
            }))
        }
    }

    #[async_trait]
    impl PromptSession for FakeSession {
        async fn prompt(&mut self, input: &str) -> Result<String> {
            self.prompts.lock().push(input.to_string());
            self.reply.clone().map_err(ClassifyError::Classification)
        }

        async fn destroy(self: Box<Self>) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"A\":[1,2]}\n```"),
            "{\"A\":[1,2]}"
        );
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {\"A\":[1]}  "), "{\"A\":[1]}");
        assert_eq!(strip_code_fences("```json {\"A\":[1]}```"), "{\"A\":[1]}");
        assert_eq!(strip_code_fences("```{\"A\":[1]}```"), "{\"A\":[1]}");
    }

    #[test]
    fn test_parse_one_line_fenced_reply() {
        let groups = parse_grouping("```json {\"A\":[1,2,3]}```", &tabs()).unwrap();
        assert_eq!(ids(&groups, "A"), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let groups = parse_grouping("```json\n{\"A\":[1,2]}\n```", &tabs()).unwrap();
        assert_eq!(ids(&groups, "A"), vec![1, 2]);
        assert_eq!(ids(&groups, "Other"), vec![3]);
    }

    #[test]
    fn test_parse_coerces_string_ids() {
        let groups = parse_grouping(r#"{"Work": ["1", 2.0], "News": [" 3 "]}"#, &tabs()).unwrap();
        assert_eq!(ids(&groups, "Work"), vec![1, 2]);
        assert_eq!(ids(&groups, "News"), vec![3]);
        assert!(!groups.contains("Other"));
    }

    #[test]
    fn test_parse_ignores_unknown_and_repeated_ids() {
        let groups =
            parse_grouping(r#"{"Work": [1, 99], "Docs": [1, 2], "News": [3]}"#, &tabs()).unwrap();
        assert_eq!(ids(&groups, "Work"), vec![1]);
        assert_eq!(ids(&groups, "Docs"), vec![2]);
        assert_eq!(groups.tab_count(), 3);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_grouping("Sure! Here are your groups.", &tabs()),
            Err(ClassifyError::Parse(_))
        ));
        assert!(matches!(
            parse_grouping("[1, 2, 3]", &tabs()),
            Err(ClassifyError::Parse(_))
        ));
        assert!(matches!(
            parse_grouping(r#"{"Work": ["one"]}"#, &tabs()),
            Err(ClassifyError::Parse(_))
        ));
        assert!(matches!(
            parse_grouping(r#"{"Work": [1.5]}"#, &tabs()),
            Err(ClassifyError::Parse(_))
        ));
    }

    #[test]
    fn test_prompt_lists_ids_and_titles_only() {
        let prompt = build_prompt(&tabs(), &LabelSet::from_labels(["Work", "News"])).unwrap();
        assert!(prompt.contains("\"id\": 1"));
        assert!(prompt.contains("\"title\": \"Headlines\""));
        assert!(prompt.contains("Work, News"));
        assert!(!prompt.contains("https://"));
    }

    #[tokio::test]
    async fn test_ready_model_groups_tabs_in_one_prompt() {
        let model = FakeModel::new(Availability::Ready, r#"{"Work": [1, 2], "News": [3]}"#);
        let prompts = Arc::clone(&model.prompts);
        let destroyed = Arc::clone(&model.destroyed);
        let backend = PromptModelBackend::new(Arc::new(model));
        let (tx, _rx) = progress_channel();

        let groups = backend
            .classify(&tabs(), &LabelSet::defaults(), &tx)
            .await
            .unwrap();

        assert_eq!(ids(&groups, "Work"), vec![1, 2]);
        assert_eq!(ids(&groups, "News"), vec![3]);
        assert_eq!(prompts.lock().len(), 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_model_aborts_before_session() {
        let model = FakeModel::new(Availability::Unavailable, "{}");
        let sessions = Arc::clone(&model.sessions);
        let backend = PromptModelBackend::new(Arc::new(model));
        let (tx, _rx) = progress_channel();

        let err = backend
            .classify(&tabs(), &LabelSet::defaults(), &tx)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifyError::UnavailableBackend(_)));
        assert_eq!(sessions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_downloadable_model_reports_download() {
        let model = FakeModel::new(Availability::Downloadable, r#"{"All": [1, 2, 3]}"#);
        let backend = PromptModelBackend::new(Arc::new(model));
        let (tx, mut rx) = progress_channel();

        let groups = backend
            .classify(&tabs(), &LabelSet::defaults(), &tx)
            .await
            .unwrap();
        assert_eq!(groups.tab_count(), 3);
        drop(tx);

        let mut messages = Vec::new();
        while let Some(ProgressEvent::Progress(message)) = rx.recv().await {
            messages.push(message);
        }
        assert_eq!(
            messages,
            vec![
                "Checking language model...",
                "Downloading language model...",
                "Downloading language model: 100%",
                "Classifying tabs...",
            ]
        );
    }

    #[tokio::test]
    async fn test_session_released_on_parse_failure() {
        let model = FakeModel::new(Availability::Ready, "I could not decide.");
        let destroyed = Arc::clone(&model.destroyed);
        let backend = PromptModelBackend::new(Arc::new(model));
        let (tx, _rx) = progress_channel();

        let err = backend
            .classify(&tabs(), &LabelSet::defaults(), &tx)
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifyError::Parse(_)));
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_released_on_prompt_failure() {
        let mut model = FakeModel::new(Availability::Ready, "");
        model.reply = Err("model crashed".to_string());
        let destroyed = Arc::clone(&model.destroyed);
        let backend = PromptModelBackend::new(Arc::new(model));
        let (tx, _rx) = progress_channel();

        let err = backend
            .classify(&tabs(), &LabelSet::defaults(), &tx)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "model crashed");
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }
}
