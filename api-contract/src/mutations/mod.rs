//! Normalizations applied to recorded calls before they are compared with
//! or written to a baseline.

mod body;
mod headers;

pub use body::{BodyReplaceMutation, BodyReplaceRegexMutation, MaskJsonFieldsMutation};
pub use headers::{MaskHeadersMutation, RemoveHeadersMutation, SetHeaderMutation};

use crate::baseline::{BaselineEntry, RecordedMessage};
use regex::Regex;
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Debug};

pub trait BodyMutation: Debug {
    fn mutate(&self, body: &mut String);
}

pub trait HeadersMutation: Debug {
    fn mutate(&self, headers: &mut BTreeMap<String, String>);
}

#[derive(Debug)]
enum MutationType {
    Body(Box<dyn BodyMutation + Send + Sync>),
    Headers(Box<dyn HeadersMutation + Send + Sync>),
}

impl MutationType {
    fn apply(&self, message: &mut RecordedMessage) {
        match self {
            MutationType::Headers(hm) => hm.mutate(&mut message.headers),
            MutationType::Body(bm) => bm.mutate(&mut message.body),
        }
    }
}

/// A mutation of the request half of a recorded call.
#[derive(Debug)]
pub struct RequestMutation {
    mutation_type: MutationType,
}

impl RequestMutation {
    fn from_mutation_type(mutation_type: MutationType) -> Self {
        Self { mutation_type }
    }

    pub fn mutate(&self, entry: &mut BaselineEntry) {
        self.mutation_type.apply(&mut entry.request);
    }
}

/// A mutation of the response half of a recorded call.
#[derive(Debug)]
pub struct ResponseMutation {
    mutation_type: MutationType,
}

impl ResponseMutation {
    fn from_mutation_type(mutation_type: MutationType) -> Self {
        Self { mutation_type }
    }

    pub fn mutate(&self, entry: &mut BaselineEntry) {
        self.mutation_type.apply(&mut entry.response);
    }
}

pub struct MutationsBuilder {
    mutations: Vec<MutationType>,
}

impl MutationsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }

    pub fn remove_headers<S: AsRef<str>, I: IntoIterator<Item = S>>(&mut self, headers: I) -> &mut Self {
        self.add_headers_mutation(RemoveHeadersMutation::named(headers))
    }

    pub fn remove_headers_regex<I: IntoIterator<Item = Regex>>(&mut self, patterns: I) -> &mut Self {
        self.add_headers_mutation(RemoveHeadersMutation::matching(patterns))
    }

    pub fn set_header<S1: AsRef<str>, S2: Into<String>>(
        &mut self,
        header_name: S1,
        header_value: S2,
    ) -> &mut Self {
        self.add_headers_mutation(SetHeaderMutation::new(header_name, header_value))
    }

    pub fn mask_headers<S: AsRef<str>, I: IntoIterator<Item = S>, M: Into<String>>(
        &mut self,
        headers: I,
        mask: M,
    ) -> &mut Self {
        self.add_headers_mutation(MaskHeadersMutation::new(headers, mask))
    }

    pub fn body_replace<S1: Into<String>, S2: Into<String>>(
        &mut self,
        text: S1,
        replacement: S2,
    ) -> &mut Self {
        self.add_body_mutation(BodyReplaceMutation::new(text, replacement))
    }

    pub fn body_replace_regex<S: Into<String>>(&mut self, pattern: Regex, replacement: S) -> &mut Self {
        self.add_body_mutation(BodyReplaceRegexMutation::new(pattern, replacement))
    }

    pub fn mask_json_fields<S: AsRef<str>, I: IntoIterator<Item = S>, M: Into<Value>>(
        &mut self,
        pointers: I,
        mask: M,
    ) -> &mut Self {
        self.add_body_mutation(MaskJsonFieldsMutation::new(pointers, mask))
    }

    pub fn add_headers_mutation<HM: HeadersMutation + Send + Sync + 'static>(
        &mut self,
        mutation: HM,
    ) -> &mut Self {
        self.mutations.push(MutationType::Headers(Box::new(mutation)));
        self
    }

    pub fn add_body_mutation<BM: BodyMutation + Send + Sync + 'static>(&mut self, mutation: BM) -> &mut Self {
        self.mutations.push(MutationType::Body(Box::new(mutation)));
        self
    }

    pub fn into_response_mutations(self) -> Vec<ResponseMutation> {
        self.mutations
            .into_iter()
            .map(ResponseMutation::from_mutation_type)
            .collect()
    }

    pub fn into_request_mutations(self) -> Vec<RequestMutation> {
        self.mutations
            .into_iter()
            .map(RequestMutation::from_mutation_type)
            .collect()
    }
}

impl Default for MutationsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
