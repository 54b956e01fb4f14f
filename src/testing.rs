//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use crate::client::{BasicAuth, BoxFuture, Credentials, HttpResponse, HttpTransport};
use crate::dispatch::Clock;
use crate::domain::UnixTimestamp;

pub(crate) fn test_credentials() -> Credentials {
    Credentials::new("https://gateway.example.invalid/api/", "test_user", "test_pass").unwrap()
}

pub(crate) fn assert_param(params: &[(String, String)], key: &str, value: &str) {
    assert!(
        params.iter().any(|(k, v)| k == key && v == value),
        "missing param {key}={value}; got: {params:?}"
    );
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) url: String,
    pub(crate) user: String,
    pub(crate) password: String,
    pub(crate) params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub(crate) fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type ScriptedReply = Result<(u16, String), String>;

#[derive(Debug, Default)]
struct ScriptedState {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<RecordedRequest>,
}

/// Replays a fixed sequence of replies and records every request.
///
/// Once the script is exhausted every further call fails as a transport error.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedTransport {
    fn from_replies(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                replies: replies.into_iter().collect(),
                requests: Vec::new(),
            })),
        }
    }

    pub(crate) fn with_statuses(statuses: impl IntoIterator<Item = u16>) -> Self {
        Self::from_replies(
            statuses
                .into_iter()
                .map(|status| Ok((status, status.to_string()))),
        )
    }

    pub(crate) fn with_replies<'a>(replies: impl IntoIterator<Item = (u16, &'a str)>) -> Self {
        Self::from_replies(
            replies
                .into_iter()
                .map(|(status, body)| Ok((status, body.to_owned()))),
        )
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::from_replies([Err(message.to_owned())])
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn sent_numbers(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| request.param("mobilenumber").map(str::to_owned))
            .collect()
    }
}

impl HttpTransport for ScriptedTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        auth: BasicAuth<'a>,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let reply = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    url: url.to_owned(),
                    user: auth.user.to_owned(),
                    password: auth.password.to_owned(),
                    params,
                });
                state
                    .replies
                    .pop_front()
                    .unwrap_or_else(|| Err("no scripted reply left".to_owned()))
            };
            match reply {
                Ok((status, body)) => Ok(HttpResponse { status, body }),
                Err(message) => Err(message.into()),
            }
        })
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: Mutex<UnixTimestamp>,
}

impl ManualClock {
    pub(crate) fn at(secs: u64) -> Self {
        Self {
            now: Mutex::new(UnixTimestamp::new(secs)),
        }
    }

    pub(crate) fn advance(&self, secs: u64) {
        let mut now = self.now.lock().unwrap();
        *now = UnixTimestamp::new(now.value() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimestamp {
        *self.now.lock().unwrap()
    }
}
