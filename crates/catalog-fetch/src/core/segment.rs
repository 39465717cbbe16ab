use catalog_name::Name;

use crate::data::Response;

/// Why a segment walk stops, or that it goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The segment number in the response name equals its declared final id.
    DeclaredFinal,

    /// No final id was declared and the caller asked to stop in that case.
    MissingFinalMarker,

    /// The segment carried no content at all.
    EmptyPayload,

    Continue,
}

impl Termination {
    pub fn is_stop(self) -> bool { self != Termination::Continue }
}

/// Segment number a response answers, preferring its own name over the
/// number that was asked for.
fn answered_segment(response: &Response, requested: u64) -> u64 {
    response.segment().unwrap_or(requested)
}

fn declared_final(response: &Response, requested: u64) -> bool {
    response
        .final_segment()
        .is_some_and(|last| last == answered_segment(response, requested))
}

/// Termination check for byte-concatenating retrieval.
///
/// The two conditions are independent: a declared final id that matches the
/// response's own segment, or a missing final id when
/// `stop_on_missing_final` is set.
pub fn segment_termination(
    response: &Response,
    requested: u64,
    stop_on_missing_final: bool,
) -> Termination {
    if declared_final(response, requested) {
        Termination::DeclaredFinal
    } else if stop_on_missing_final && !response.has_final_marker() {
        Termination::MissingFinalMarker
    } else {
        Termination::Continue
    }
}

/// Termination check for segment-by-segment decoding, where every segment is
/// a complete unit and an empty one ends the walk.
pub fn completion_termination(response: &Response, requested: u64) -> Termination {
    if response.is_empty() {
        Termination::EmptyPayload
    } else if declared_final(response, requested) {
        Termination::DeclaredFinal
    } else {
        Termination::Continue
    }
}

/// Name of the segment after `response`, derived from the response's own
/// name. `None` when that name does not end in a segment number.
pub fn next_segment_name(response: &Response) -> Option<Name> {
    let segment = response.segment()?;
    Some(response.name.parent().append_segment(segment + 1))
}
