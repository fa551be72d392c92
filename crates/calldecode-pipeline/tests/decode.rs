use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use calldecode_abi::encode_call;
use calldecode_core::{
    signature, CodecError, DecodedValue, ParamType, RegistryError, ResolveError, Selector,
};
use calldecode_pipeline::{decode_with_signature, parse_calldata_hex, DecodePipeline, PipelineError};
use calldecode_resolver::{
    MemoryRegistry, ResolverConfig, RetryConfig, SelectorResolver, SignatureRegistry,
};
use std::sync::Arc;

const TRANSFER: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);

fn config() -> ResolverConfig {
    ResolverConfig {
        retry: RetryConfig::disabled(),
        ..Default::default()
    }
}

fn pipeline(signatures: &[&str]) -> DecodePipeline {
    let registry = MemoryRegistry::from_signatures(signatures.iter().copied()).unwrap();
    DecodePipeline::new(Arc::new(SelectorResolver::new(Arc::new(registry), &config())))
}

fn beef() -> [u8; 20] {
    let mut bytes = [0u8; 20];
    bytes[18] = 0xbe;
    bytes[19] = 0xef;
    bytes
}

fn word(hex_digits: &str) -> String {
    format!("{hex_digits:0>64}")
}

#[tokio::test]
async fn decodes_transfer_calldata() {
    let pipeline = pipeline(&["transfer(address,uint256)", "approve(address,uint256)"]);
    let calldata = format!("0xa9059cbb{}{}", word("beef"), word("03e8"));

    let call = pipeline.decode_hex(&calldata).await.unwrap();

    assert_eq!(call.selector, TRANSFER);
    assert_eq!(call.function_name(), "transfer");
    assert_eq!(call.arguments.len(), call.signature.parameters.len());
    assert_eq!(
        call.argument(0).and_then(DecodedValue::as_address),
        Some(Address::from(beef()))
    );
    assert_eq!(call.argument(1).and_then(DecodedValue::as_uint), Some(U256::from(1000u64)));
    assert_eq!(call.candidates, vec!["transfer(address,uint256)"]);
    assert!(call.ambiguity().is_none());
}

#[tokio::test]
async fn decodes_string_and_dynamic_array() {
    let sig = signature::parse("foo(string,uint256[])").unwrap();
    let values = vec![
        DecodedValue::String("gm".into()),
        DecodedValue::Array {
            elem: ParamType::Uint(256),
            values: vec![DecodedValue::uint256(U256::from(7u64)), DecodedValue::uint256(U256::MAX)],
        },
    ];
    let calldata = encode_call(&sig, &values).unwrap();

    let call = pipeline(&["foo(string,uint256[])"]).decode_call(&calldata).await.unwrap();

    let decoded: Vec<_> = call.arguments.into_iter().map(|(_, v)| v).collect();
    assert_eq!(decoded, values);
}

#[tokio::test]
async fn unknown_selector_is_not_found() {
    let err = pipeline(&["transfer(address,uint256)"])
        .decode_hex("0x00000000")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Resolve(ResolveError::NotFound {
            selector: Selector::new([0; 4])
        })
    );
    assert_eq!(err.kind(), "not_found");
    assert!(!err.is_internal());
}

#[tokio::test]
async fn huge_array_length_is_out_of_bounds() {
    let calldata = format!(
        "0x{}{}{}",
        signature::parse("batch(uint256[])").unwrap().selector().hex_key(),
        word("20"),
        word("ffffffff"),
    );
    let err = pipeline(&["batch(uint256[])"]).decode_hex(&calldata).await.unwrap_err();
    assert!(
        matches!(err, PipelineError::Codec(CodecError::OffsetOutOfBounds { .. })),
        "{err:?}"
    );
}

#[tokio::test]
async fn short_calldata_fails_before_resolution() {
    let pipeline = pipeline(&[]);
    for input in ["", "0x", "0xa9059c"] {
        let err = pipeline.decode_hex(input).await.unwrap_err();
        assert!(matches!(err, PipelineError::TruncatedCalldata { .. }), "{input}");
        assert_eq!(err.kind(), "type_decode");
    }
    assert_eq!(pipeline.resolver().cache_len().await, 0);
}

#[tokio::test]
async fn truncated_body_is_codec_error() {
    let calldata = format!("0xa9059cbb{}", word("beef"));
    let err = pipeline(&["transfer(address,uint256)"])
        .decode_hex(&calldata)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Codec(CodecError::OffsetOutOfBounds {
            position: 32,
            available: 32
        })
    );
}

#[tokio::test]
async fn ambiguous_selector_uses_registry_order() {
    let registry = MemoryRegistry::new();
    registry.insert_at(TRANSFER, "many_msg_babbage(bytes1)");
    registry.insert_at(TRANSFER, "transfer(address,uint256)");
    let pipeline =
        DecodePipeline::new(Arc::new(SelectorResolver::new(Arc::new(registry), &config())));

    // bytes1 0xab, then a trailing word
    let calldata = format!("0xa9059cbb{:0<64}{}", "ab", word("01"));
    let call = pipeline.decode_hex(&calldata).await.unwrap();

    assert_eq!(call.signature.canonical(), "many_msg_babbage(bytes1)");
    assert_eq!(call.argument(0), Some(&DecodedValue::FixedBytes(vec![0xab])));
    let ambiguity = call.ambiguity().unwrap();
    assert_eq!(ambiguity.chosen, "many_msg_babbage(bytes1)");
    assert_eq!(
        ambiguity.candidates,
        vec!["many_msg_babbage(bytes1)", "transfer(address,uint256)"]
    );
}

#[tokio::test]
async fn mismatched_registry_entry_is_internal_error() {
    let registry = MemoryRegistry::new();
    registry.insert_at(TRANSFER, "approve(address,uint256)");
    let pipeline =
        DecodePipeline::new(Arc::new(SelectorResolver::new(Arc::new(registry), &config())));

    let err = pipeline
        .decode_hex(&format!("0xa9059cbb{}{}", word("01"), word("02")))
        .await
        .unwrap_err();
    assert!(err.is_internal());
    assert_eq!(err.kind(), "selector_mismatch");
}

struct DownRegistry;

#[async_trait]
impl SignatureRegistry for DownRegistry {
    async fn lookup(&self, _selector: Selector) -> Result<Vec<String>, RegistryError> {
        Err(RegistryError::Status { status: 503 })
    }

    fn name(&self) -> &str {
        "down"
    }
}

#[tokio::test]
async fn registry_outage_is_network_error() {
    let pipeline =
        DecodePipeline::new(Arc::new(SelectorResolver::new(Arc::new(DownRegistry), &config())));
    let err = pipeline
        .decode_hex(&format!("0xa9059cbb{}{}", word("01"), word("02")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "network");
    assert_eq!(pipeline.resolver().cache_len().await, 0);
}

#[tokio::test]
async fn concurrent_decodes_share_the_resolver() {
    let pipeline = pipeline(&["transfer(address,uint256)"]);
    let calldata = parse_calldata_hex(&format!("0xa9059cbb{}{}", word("01"), word("02"))).unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let pipeline = pipeline.clone();
            let calldata = calldata.clone();
            tokio::spawn(async move { pipeline.decode_call(&calldata).await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().function_name(), "transfer");
    }
    assert_eq!(pipeline.resolver().cache_len().await, 1);
}

#[test]
fn explicit_signature_bypasses_resolver() {
    let calldata = parse_calldata_hex(&format!("0xa9059cbb{}{}", word("beef"), word("03e8"))).unwrap();

    let call = decode_with_signature(&calldata, "transfer(address to, uint256 amount)").unwrap();
    assert!(call.candidates.is_empty());
    assert_eq!(call.named("amount").and_then(DecodedValue::as_uint), Some(U256::from(1000u64)));

    let err = decode_with_signature(&calldata, "approve(address,uint256)").unwrap_err();
    assert!(matches!(err, PipelineError::SignatureMismatch { .. }));
    assert_eq!(err.kind(), "signature_mismatch");
    assert!(!err.is_internal());

    let err = decode_with_signature(&calldata, "transfer(address,uint7)").unwrap_err();
    assert_eq!(err.kind(), "syntax");
}

#[test]
fn render_projection() {
    let sig = signature::parse("mint(address,uint256[],string,bool)").unwrap();
    let calldata = encode_call(
        &sig,
        &[
            DecodedValue::Address(Address::repeat_byte(0x11)),
            DecodedValue::Array {
                elem: ParamType::Uint(256),
                values: vec![DecodedValue::uint256(U256::from(1u64))],
            },
            DecodedValue::String("ipfs://x".into()),
            DecodedValue::Bool(false),
        ],
    )
    .unwrap();

    let rendered = decode_with_signature(&calldata, &sig.canonical()).unwrap().render();

    let summary: Vec<_> = rendered
        .iter()
        .map(|p| (p.index, p.declared_type.as_str(), p.binding.as_str(), p.value.as_str(), p.is_quoted()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "address", "param_address_1", "0x1111111111111111111111111111111111111111", true),
            (2, "uint256[]", "param_uint256___2", "[]", false),
            (3, "string", "param_string_3", "ipfs://x", true),
            (4, "bool", "param_bool_4", "false", false),
        ]
    );
}

#[test]
fn decoded_call_serializes_to_json() {
    let calldata = parse_calldata_hex(&format!("0xa9059cbb{}{}", word("beef"), word("03e8"))).unwrap();
    let call = decode_with_signature(&calldata, "transfer(address,uint256)").unwrap();

    let json = serde_json::to_value(&call).unwrap();
    assert_eq!(json["selector"], "0xa9059cbb");
    assert_eq!(json["signature"]["name"], "transfer");

    let back: calldecode_pipeline::DecodedCall = serde_json::from_value(json).unwrap();
    assert_eq!(back, call);
}
