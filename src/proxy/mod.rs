//! Builds and parses image URLs for one proxy host
//!
//! A `Proxy` owns the host name, the optional signing secret and the parse settings.

use std::fmt;

use crate::codec::Separator;
use crate::error::FluxError;
use crate::image::parser::parameter_start;
use crate::image::{Config, ParseOptions};
use crate::signature::{Signer, SIGNATURE_KEY};

/// Prefix of a path that carries a parameter block
const PARAMS_PREFIX: &str = "/c/";

/// An image proxy endpoint
#[derive(Debug, Clone)]
pub struct Proxy {
    host: String,
    signer: Option<Signer>,
    options: ParseOptions,
}

impl Proxy {
    /// Create a proxy for `host` without signing
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            signer: None,
            options: ParseOptions::default(),
        }
    }

    /// Sign generated URLs and require signatures on parsed ones
    ///
    /// An empty secret disables signing.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.signer = if secret.is_empty() {
            None
        } else {
            Some(Signer::new(secret))
        };
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Returns an image served via this proxy
    pub fn image(&self, path: impl Into<String>, config: Option<Config>) -> Image<'_> {
        Image {
            proxy: self,
            path: path.into(),
            config,
        }
    }

    /// Parses a request path and checks its signature
    ///
    /// `signature` is a token supplied outside the path, e.g. in a query
    /// parameter. When present and non-empty it takes precedence over any
    /// `sig=` in the path. Without a secret no signature is checked; with one,
    /// a missing signature is rejected.
    pub fn parse(&self, path: &str, signature: Option<&str>) -> Result<Image<'_>, FluxError> {
        let parsed = self.options.parse_path(path)?;

        if let Some(signer) = &self.signer {
            let token = signature
                .filter(|s| !s.is_empty())
                .or(parsed.signature)
                .ok_or(FluxError::InvalidSignature)?;
            if let Err(e) = signer.verify(token, &parsed.signed_data) {
                tracing::warn!(
                    path = %parsed.rest,
                    external = signature.is_some_and(|s| !s.is_empty()),
                    "Signature verification failed"
                );
                return Err(e);
            }
        }

        Ok(Image {
            proxy: self,
            path: parsed.rest.to_string(),
            config: Some(parsed.config),
        })
    }
}

/// An image hosted behind a proxy
#[derive(Debug, Clone)]
pub struct Image<'p> {
    pub proxy: &'p Proxy,
    pub path: String,
    pub config: Option<Config>,
}

impl Image<'_> {
    /// URL without a signature
    pub fn url(&self) -> String {
        self.with_host(&self.request_path(Separator::Literal))
    }

    /// URL with `sig=` as the first parameter when the proxy has a secret
    pub fn signed_url(&self) -> String {
        self.with_host(&self.signed_path(Separator::Literal))
    }

    /// Like [`Image::signed_url`], but with `%2C` between parameters
    ///
    /// The signature covers the escaped form, so the URL can pass through
    /// systems that split on bare commas.
    pub fn signed_url_without_comma(&self) -> String {
        self.with_host(&self.signed_path(Separator::Escaped))
    }

    /// The signature token, if the proxy has a secret
    pub fn signature(&self) -> Option<String> {
        let signer = self.proxy.signer.as_ref()?;
        Some(signer.sign(&self.request_path(Separator::Literal)))
    }

    fn with_host(&self, path: &str) -> String {
        let mut url = String::with_capacity("https://".len() + self.proxy.host.len() + path.len());
        url.push_str("https://");
        url.push_str(&self.proxy.host);
        url.push_str(path);
        url
    }

    /// `/c/<params>/<path>`, or just `/<path>` when nothing is set
    ///
    /// A bare path that would itself read as a parameter block (`/c/...`, or
    /// an `=` in the first segment) keeps an explicit `f=auto` block.
    fn request_path(&self, sep: Separator) -> String {
        let mut p = String::with_capacity(self.path.len() + 64);
        match self.config.as_ref().filter(|c| !c.is_default()) {
            Some(config) => {
                p.push_str(PARAMS_PREFIX);
                config.append(&mut p, sep);
                if !self.path.is_empty() {
                    push_rooted(&mut p, &self.path);
                }
            }
            None if parameter_start(&self.path).is_some() => {
                p.push_str(PARAMS_PREFIX);
                Config::default().append(&mut p, sep);
                push_rooted(&mut p, &self.path);
            }
            None => push_rooted(&mut p, &self.path),
        }
        p
    }

    fn signed_path(&self, sep: Separator) -> String {
        let path = self.request_path(sep);
        let Some(signer) = &self.proxy.signer else {
            return path;
        };
        let token = signer.sign(&path);

        let mut signed = String::with_capacity(path.len() + token.len() + 16);
        signed.push_str(PARAMS_PREFIX);
        signed.push_str(SIGNATURE_KEY);
        signed.push('=');
        signed.push_str(&token);
        match path.strip_prefix(PARAMS_PREFIX) {
            Some(params) => {
                sep.push(&mut signed);
                signed.push_str(params);
            }
            None => signed.push_str(&path),
        }
        signed
    }
}

impl fmt::Display for Image<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

fn push_rooted(buf: &mut String, path: &str) {
    if !path.starts_with('/') {
        buf.push('/');
    }
    buf.push_str(path);
}
