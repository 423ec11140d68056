use std::fmt;
use std::str::FromStr;

/// Identity providers whose introspection endpoints we know how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    Facebook,
}

/// How to reach a provider and how to read its answer.
#[derive(Debug)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub endpoint: &'static str,
    /// Query parameters that each carry the raw token.
    pub token_params: &'static [&'static str],
    /// Subject id fields, most specific first.
    pub id_fields: &'static [&'static str],
}

static GOOGLE: ProviderSpec = ProviderSpec {
    name: "google",
    endpoint: "https://www.googleapis.com/oauth2/v1/tokeninfo",
    token_params: &["access_token"],
    id_fields: &["user_id", "sub"],
};

static FACEBOOK: ProviderSpec = ProviderSpec {
    name: "facebook",
    endpoint: "https://graph.facebook.com/debug_token",
    token_params: &["input_token", "access_token"],
    id_fields: &["user_id", "sub"],
};

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::Facebook];

    pub fn spec(self) -> &'static ProviderSpec {
        match self {
            Provider::Google => &GOOGLE,
            Provider::Facebook => &FACEBOOK,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
