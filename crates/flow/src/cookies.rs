use std::{collections::HashMap, fmt};

use chrono::Duration;

/// Cookies sent by the client plus the `Set-Cookie` values to send back.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: HashMap<String, String>,
    outgoing: Vec<SetCookie>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub max_age: Option<Duration>,
    pub http_only: bool,
}

impl SetCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: None,
            http_only: false,
        }
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path=/; SameSite=Lax", self.name, self.value)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age.num_seconds().max(0))?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a jar from raw `Cookie` header values. Later duplicates win.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut incoming = HashMap::new();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                incoming.insert(
                    name.to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }
        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.incoming.get(name).map(String::as_str)
    }

    /// A cookie counts as present only with a non-empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }

    pub fn set(&mut self, cookie: SetCookie) {
        self.outgoing.retain(|existing| existing.name != cookie.name);
        self.outgoing.push(cookie);
    }

    pub fn outgoing(&self) -> &[SetCookie] {
        &self.outgoing
    }

    pub fn into_outgoing(self) -> Vec<SetCookie> {
        self.outgoing
    }
}

#[cfg(test)]
#[path = "tests/cookies_tests.rs"]
mod tests;
