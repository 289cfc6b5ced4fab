use anchor_idl_decoder::{
    parse_idl, parse_idl_file, Category, DecodedValue, DecoderOptions, Discriminator, Error, Idl,
    EVENT_IX_TAG,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use borsh::BorshSerialize;
use serde_json::json;
use solana_program::pubkey::Pubkey;

const LEGACY_IDL: &str = r#"{
  "version": "0.1.0",
  "name": "orderbook",
  "instructions": [
    {
      "name": "placeOrder",
      "accounts": [{ "name": "market", "isMut": true, "isSigner": false }],
      "args": [{ "name": "params", "type": { "defined": "OrderParams" } }]
    },
    { "name": "cancelAll", "accounts": [], "args": [] }
  ],
  "accounts": [
    {
      "name": "Market",
      "type": {
        "kind": "struct",
        "fields": [
          { "name": "authority", "type": "publicKey" },
          { "name": "seats", "type": { "vec": "u16" } },
          { "name": "fees", "type": { "array": ["u64", 2] } }
        ]
      }
    }
  ],
  "events": [
    {
      "name": "OrderPlaced",
      "fields": [
        { "name": "orderId", "type": "u128", "index": false },
        { "name": "side", "type": { "defined": "Side" }, "index": false },
        { "name": "memo", "type": "string", "index": false }
      ]
    }
  ],
  "types": [
    {
      "name": "OrderParams",
      "type": {
        "kind": "struct",
        "fields": [
          { "name": "side", "type": { "defined": "Side" } },
          { "name": "price", "type": "u64" },
          { "name": "size", "type": "i64" },
          { "name": "kind", "type": { "defined": "OrderKind" } }
        ]
      }
    },
    {
      "name": "Side",
      "type": { "kind": "enum", "variants": [{ "name": "Bid" }, { "name": "Ask" }] }
    },
    {
      "name": "OrderKind",
      "type": {
        "kind": "enum",
        "variants": [
          { "name": "Limit", "fields": [{ "name": "postOnly", "type": "bool" }] },
          { "name": "Market", "fields": ["u8", "i32"] }
        ]
      }
    }
  ]
}"#;

const MODERN_IDL: &str = r#"{
  "address": "Count3AcZucFDPSFBAeHkQ6AvttieKUkyJ8HiQGhQwe",
  "metadata": { "name": "counter", "version": "0.1.0", "spec": "0.1.0" },
  "instructions": [
    {
      "name": "increment",
      "discriminator": [11, 18, 104, 9, 104, 174, 59, 33],
      "accounts": [],
      "args": [{ "name": "amount", "type": "u64" }]
    }
  ],
  "accounts": [{ "name": "Counter", "discriminator": [255, 176, 4, 245, 188, 253, 124, 25] }],
  "events": [{ "name": "CounterChanged", "discriminator": [1, 2, 3, 4, 5, 6, 7, 8] }],
  "types": [
    {
      "name": "Counter",
      "type": {
        "kind": "struct",
        "fields": [
          { "name": "count", "type": "u64" },
          { "name": "owner", "type": "pubkey" },
          { "name": "history", "type": { "vec": { "defined": { "name": "Entry" } } } }
        ]
      }
    },
    {
      "name": "Entry",
      "type": {
        "kind": "struct",
        "fields": [
          { "name": "delta", "type": "i128" },
          { "name": "tag", "type": { "array": ["u8", 4] } }
        ]
      }
    },
    {
      "name": "CounterChanged",
      "type": {
        "kind": "struct",
        "fields": [
          { "name": "before", "type": "u64" },
          { "name": "after", "type": "u64" }
        ]
      }
    }
  ]
}"#;

#[derive(BorshSerialize)]
enum Side {
    #[allow(dead_code)]
    Bid,
    Ask,
}

#[derive(BorshSerialize)]
enum OrderKind {
    #[allow(dead_code)]
    Limit { post_only: bool },
    Market(u8, i32),
}

#[derive(BorshSerialize)]
struct OrderParams {
    side: Side,
    price: u64,
    size: i64,
    kind: OrderKind,
}

#[derive(BorshSerialize)]
struct Market {
    authority: [u8; 32],
    seats: Vec<u16>,
    fees: [u64; 2],
}

#[derive(BorshSerialize)]
struct OrderPlaced {
    order_id: u128,
    side: Side,
    memo: String,
}

#[derive(BorshSerialize)]
struct Entry {
    delta: i128,
    tag: [u8; 4],
}

#[derive(BorshSerialize)]
struct Counter {
    count: u64,
    owner: [u8; 32],
    history: Vec<Entry>,
}

#[derive(BorshSerialize)]
struct CounterChanged {
    before: u64,
    after: u64,
}

fn with_discriminator(disc: &[u8], body: impl BorshSerialize) -> anyhow::Result<Vec<u8>> {
    let mut data = disc.to_vec();
    data.extend(body.try_to_vec()?);
    Ok(data)
}

fn order_placed_bytes() -> anyhow::Result<Vec<u8>> {
    with_discriminator(
        Discriminator::computed(Category::Event, "OrderPlaced").as_bytes(),
        OrderPlaced {
            order_id: u128::MAX - 1,
            side: Side::Ask,
            memo: "hi".into(),
        },
    )
}

#[test]
fn legacy_instruction_with_nested_types() -> anyhow::Result<()> {
    let idl = parse_idl(LEGACY_IDL)?;
    assert_eq!(idl.program_name, "orderbook");

    let data = with_discriminator(
        Discriminator::computed(Category::Instruction, "placeOrder").as_bytes(),
        OrderParams {
            side: Side::Ask,
            price: 100,
            size: -5,
            kind: OrderKind::Market(3, -7),
        },
    )?;
    let parsed = idl.decode_instruction(&data)?;
    assert_eq!(parsed.name, "placeOrder");
    assert_eq!(parsed.category, Category::Instruction);
    assert_eq!(
        serde_json::to_value(&parsed.data)?,
        json!({
            "params": {
                "side": { "Ask": {} },
                "price": "100",
                "size": "-5",
                "kind": { "Market": [3, -7] }
            }
        })
    );

    let cancel = Discriminator::computed(Category::Instruction, "cancelAll");
    let parsed = idl.decode_instruction(cancel.as_bytes())?;
    assert_eq!(parsed.name, "cancelAll");
    assert_eq!(parsed.data, DecodedValue::Struct(vec![]));
    Ok(())
}

#[test]
fn legacy_account_with_inline_layout() -> anyhow::Result<()> {
    let idl = parse_idl(LEGACY_IDL)?;
    let data = with_discriminator(
        Discriminator::computed(Category::Account, "Market").as_bytes(),
        Market {
            authority: [7; 32],
            seats: vec![1, 2],
            fees: [10, 20],
        },
    )?;
    let parsed = idl.decode_account(&data)?;
    assert_eq!(parsed.name, "Market");
    assert_eq!(
        serde_json::to_value(&parsed)?,
        json!({
            "name": "Market",
            "type": "account",
            "discriminator": Discriminator::computed(Category::Account, "Market").as_bytes(),
            "data": {
                "authority": Pubkey::new_from_array([7; 32]).to_string(),
                "seats": [1, 2],
                "fees": ["10", "20"]
            }
        })
    );
    Ok(())
}

#[test]
fn legacy_event_from_log_line_and_cpi() -> anyhow::Result<()> {
    let idl = parse_idl(LEGACY_IDL)?;
    let event = order_placed_bytes()?;
    let expected = json!({
        "orderId": "340282366920938463463374607431768211454",
        "side": { "Ask": {} },
        "memo": "hi"
    });

    let line = format!("Program data: {}", STANDARD.encode(&event));
    let parsed = idl.decode_event_log(&line)?;
    assert_eq!(parsed.name, "OrderPlaced");
    assert_eq!(parsed.category, Category::Event);
    assert_eq!(serde_json::to_value(&parsed.data)?, expected);

    let mut cpi = EVENT_IX_TAG.to_le_bytes().to_vec();
    cpi.extend_from_slice(&event);
    let parsed = idl.decode_instruction(&cpi)?;
    assert_eq!(parsed.category, Category::Event);
    assert_eq!(serde_json::to_value(&parsed.data)?, expected);
    Ok(())
}

#[test]
fn modern_idl_with_explicit_discriminators() -> anyhow::Result<()> {
    let idl = parse_idl(MODERN_IDL)?;
    assert_eq!(idl.program_name, "counter");

    let parsed = idl.decode_instruction(&with_discriminator(
        &[11, 18, 104, 9, 104, 174, 59, 33],
        42u64,
    )?)?;
    assert_eq!(parsed.name, "increment");
    assert_eq!(parsed.data.field("amount"), Some(&DecodedValue::U64(42)));

    let owner = Pubkey::new_from_array([3; 32]);
    let data = with_discriminator(
        &[255, 176, 4, 245, 188, 253, 124, 25],
        Counter {
            count: 2,
            owner: owner.to_bytes(),
            history: vec![
                Entry {
                    delta: -1,
                    tag: *b"dec!",
                },
                Entry {
                    delta: i128::MAX,
                    tag: [0; 4],
                },
            ],
        },
    )?;
    let parsed = idl.decode_account(&data)?;
    assert_eq!(parsed.name, "Counter");
    assert_eq!(
        serde_json::to_value(&parsed.data)?,
        json!({
            "count": "2",
            "owner": owner.to_string(),
            "history": [
                { "delta": "-1", "tag": [100, 101, 99, 33] },
                { "delta": i128::MAX.to_string(), "tag": [0, 0, 0, 0] }
            ]
        })
    );

    let parsed = idl.decode_event(&with_discriminator(
        &[1, 2, 3, 4, 5, 6, 7, 8],
        CounterChanged {
            before: 1,
            after: 2,
        },
    )?)?;
    assert_eq!(parsed.name, "CounterChanged");
    assert_eq!(
        serde_json::to_value(&parsed.data)?,
        json!({ "before": "1", "after": "2" })
    );
    Ok(())
}

#[test]
fn truncated_account_tolerant_versus_strict() -> anyhow::Result<()> {
    let idl = parse_idl(MODERN_IDL)?;
    let mut data = vec![255, 176, 4, 245, 188, 253, 124, 25];
    data.extend_from_slice(&9u64.to_le_bytes());
    data.extend_from_slice(&[1, 2, 3]);

    let parsed = idl.decode_account(&data)?;
    assert_eq!(parsed.data.field("count"), Some(&DecodedValue::U64(9)));
    assert_eq!(parsed.data.field("owner"), Some(&DecodedValue::Null));
    assert_eq!(parsed.data.field("history"), Some(&DecodedValue::Vec(vec![])));

    assert!(matches!(
        idl.decode_account_with(&data, DecoderOptions::strict()),
        Err(Error::InsufficientData { needed: 32, remaining: 3, .. })
    ));
    Ok(())
}

#[test]
fn unknown_payloads_are_errors() -> anyhow::Result<()> {
    let idl = parse_idl(MODERN_IDL)?;
    assert!(matches!(
        idl.decode_instruction(&[0; 12]),
        Err(Error::NoMatch { .. })
    ));
    assert!(matches!(
        idl.decode_account(&[255, 176]),
        Err(Error::InvalidLength { needed: 8, actual: 2 })
    ));
    assert!(matches!(
        idl.decode_event_log("Program log: Instruction: Increment"),
        Err(Error::DecodeFailure { .. })
    ));

    let no_events = Idl {
        events: None,
        ..idl
    };
    assert!(matches!(
        no_events.decode_event(&[1, 2, 3, 4, 5, 6, 7, 8]),
        Err(Error::SchemaSectionMissing { section: "events" })
    ));
    Ok(())
}

#[test]
fn loads_idl_from_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("anchor-idl-decoder-{}.json", std::process::id()));
    std::fs::write(&path, MODERN_IDL)?;
    let idl = parse_idl_file(&path);
    std::fs::remove_file(&path)?;
    assert_eq!(idl?.program_name, "counter");

    assert!(matches!(
        parse_idl_file("does/not/exist.json"),
        Err(Error::Io(_))
    ));
    Ok(())
}

#[test]
fn unknown_types_only_fail_where_used() -> anyhow::Result<()> {
    let idl = parse_idl(
        r#"{
          "name": "vault",
          "instructions": [
            { "name": "ping", "accounts": [], "args": [{ "name": "nonce", "type": "u8" }] },
            {
              "name": "configure",
              "accounts": [],
              "args": [
                { "name": "limit", "type": { "coption": "u64" } },
                { "name": "supply", "type": "u256" }
              ]
            }
          ]
        }"#,
    )?;

    let mut data = Discriminator::computed(Category::Instruction, "ping")
        .as_bytes()
        .to_vec();
    data.push(7);
    let parsed = idl.decode_instruction(&data)?;
    assert_eq!(parsed.name, "ping");
    assert_eq!(parsed.data.field("nonce"), Some(&DecodedValue::U8(7)));

    let mut data = Discriminator::computed(Category::Instruction, "configure")
        .as_bytes()
        .to_vec();
    data.extend_from_slice(&[1, 2, 3]);
    let parsed = idl.decode_instruction(&data)?;
    assert_eq!(parsed.data.field("limit"), Some(&DecodedValue::Null));
    assert_eq!(parsed.data.field("supply"), Some(&DecodedValue::Null));
    assert!(matches!(
        idl.decode_instruction_with(&data, DecoderOptions::strict()),
        Err(Error::DecodeFailure { .. })
    ));
    Ok(())
}
