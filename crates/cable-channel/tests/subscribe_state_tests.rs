// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use cable_channel::{
    run_subscribe, Channel, ChannelDef, ChannelIdentity, Coder, CompatibilityError,
    ConnectionIdentifiers, StreamSink, SubscribeOutcome, SubscriptionContext, SubscriptionParams,
};
use serde_json::json;

struct NullSink;

impl StreamSink for NullSink {
    fn register(&mut self, _identity: &ChannelIdentity, _target: &str, _coder: Coder) {}
}

fn identity_with_params(params: SubscriptionParams) -> ChannelIdentity {
    let mut identifiers = ConnectionIdentifiers::new();
    identifiers.insert("current_user".into(), json!("john"));
    ChannelIdentity::new(identifiers, "ChatChannel", params)
}

struct NoOp;

impl Channel for NoOp {
    fn subscribed(&self, _ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
        Ok(())
    }
}

#[test]
fn hook_that_sets_nothing_passes() {
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);
    assert_eq!(
        run_subscribe(&def, &NoOp, &mut ctx).unwrap(),
        SubscribeOutcome::Accepted
    );
}

#[test]
fn declared_attribute_derived_from_params_passes() {
    let def = ChannelDef::builder("ChatChannel").attribute("room_id").build();
    let mut params = SubscriptionParams::new();
    params.insert("room_id".into(), json!(42));
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(params), &mut sink);

    struct DerivesRoom;
    impl Channel for DerivesRoom {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            let room = ctx.params().get("room_id").cloned().unwrap_or(json!(null));
            ctx.set_attribute("room_id", room);
            Ok(())
        }
    }

    assert!(run_subscribe(&def, &DerivesRoom, &mut ctx).is_ok());
    assert_eq!(ctx.attributes().get("room_id"), Some(&json!(42)));
}

#[test]
fn undeclared_attribute_raises_new_state() {
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);

    struct Accumulates;
    impl Channel for Accumulates {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            ctx.set_attribute("seen_messages", json!(0));
            Ok(())
        }
    }

    match run_subscribe(&def, &Accumulates, &mut ctx) {
        Err(CompatibilityError::NewStateIntroduced(key)) => assert_eq!(key, "seen_messages"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn violation_message_names_the_attribute() {
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);

    struct Accumulates;
    impl Channel for Accumulates {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            ctx.set_attribute("cursor", json!("abc"));
            Ok(())
        }
    }

    let err = run_subscribe(&def, &Accumulates, &mut ctx).unwrap_err();
    assert!(err.to_string().contains("`cursor`"));
}

#[test]
fn bag_is_left_as_the_hook_produced_it() {
    // No rollback: the calling layer discards the instance entirely.
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);

    struct Accumulates;
    impl Channel for Accumulates {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            ctx.set_attribute("cursor", json!("abc"));
            Ok(())
        }
    }

    assert!(run_subscribe(&def, &Accumulates, &mut ctx).is_err());
    assert_eq!(ctx.attributes().get("cursor"), Some(&json!("abc")));
}

#[test]
fn channel_rejection_is_distinct_from_a_violation() {
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);

    struct Unauthorized;
    impl Channel for Unauthorized {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            ctx.reject();
            Ok(())
        }
    }

    assert_eq!(
        run_subscribe(&def, &Unauthorized, &mut ctx).unwrap(),
        SubscribeOutcome::Rejected
    );
}

#[test]
fn gate_error_inside_the_hook_wins_over_state_verification() {
    // A refused stream aborts the hook before the differ runs; the error is
    // the stream gate's, not the differ's.
    let def = ChannelDef::builder("ChatChannel").build();
    let mut sink = NullSink;
    let mut ctx = SubscriptionContext::new(identity_with_params(SubscriptionParams::new()), &mut sink);

    struct BadCoderAndState;
    impl Channel for BadCoderAndState {
        fn subscribed(&self, ctx: &mut SubscriptionContext<'_>) -> Result<(), CompatibilityError> {
            ctx.set_attribute("cursor", json!(1));
            ctx.stream_from_request(
                cable_channel::StreamRequest::new("all").with_coder(Coder::Raw),
            )
        }
    }

    let err = run_subscribe(&def, &BadCoderAndState, &mut ctx).unwrap_err();
    assert_eq!(err, CompatibilityError::UnsupportedCoder);
}
