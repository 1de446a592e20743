use std::{ptr, thread};

use fixedwidth::{
    Codec, CodecError, Descriptor, DescriptorBuilder, Error, FieldCodec, InvalidTag, Range, Record,
    TagError,
};

#[derive(Debug, Default, PartialEq)]
struct Account {
    number: u64,
    holder: String,
    balance: f64,
    // Not mapped.
    touched: bool,
}

impl Record for Account {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .field("number", "1,8", |r| &r.number, |r| &mut r.number)
            .field("holder", " 9 , 20 ", |r| &r.holder, |r| &mut r.holder)
            .field("balance", "21,30", |r| &r.balance, |r| &mut r.balance);
    }
}

const ACCOUNTS: &[u8] = b"\
00001234Ada Lovelace   1024.25
00000042Grace Hopper     -17.5
";

#[test]
fn describe_account() {
    let descriptor = Account::descriptor().unwrap();
    let fields = descriptor.fields();

    let names: Vec<_> = fields.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["number", "holder", "balance"]);

    assert_eq!(fields[1].range(), Range::new(9, 20).unwrap());
    assert_eq!(fields[1].range().width(), 12);

    let codecs: Vec<_> = fields.iter().map(|f| f.codec()).collect();
    assert_eq!(codecs, [Codec::Integer, Codec::Text, Codec::Float]);

    assert_eq!(descriptor.width(), 30);
}

#[test]
fn descriptor_is_cached() {
    let first = Account::descriptor().unwrap();
    let second = Account::descriptor().unwrap();
    assert!(ptr::eq(first, second));
}

#[test]
fn descriptor_is_shared_between_threads() {
    let found: Vec<&'static Descriptor<Account>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| Account::descriptor().unwrap()))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(found.windows(2).all(|w| ptr::eq(w[0], w[1])));
}

#[test]
fn decode_accounts() {
    let mut accounts = Vec::<Account>::new();
    fixedwidth::decode(ACCOUNTS, &mut accounts).unwrap();

    assert_eq!(
        accounts,
        [
            Account {
                number: 1234,
                holder: "Ada Lovelace".to_string(),
                balance: 1024.25,
                touched: false,
            },
            Account {
                number: 42,
                holder: "Grace Hopper".to_string(),
                balance: -17.5,
                touched: false,
            },
        ]
    );
}

#[test]
fn decode_leaves_unmapped_fields() {
    let mut account = Account {
        touched: true,
        ..Default::default()
    };
    fixedwidth::decode(ACCOUNTS, &mut account).unwrap();

    assert_eq!(account.number, 1234);
    assert!(account.touched);
}

#[test]
fn encode_accounts() {
    let accounts = [
        Account {
            number: 1234,
            holder: "Ada Lovelace".to_string(),
            balance: 1024.25,
            touched: false,
        },
        Account {
            number: 42,
            holder: "Grace Hopper".to_string(),
            balance: -17.5,
            touched: true,
        },
    ];

    // Integers are padded with spaces, not zeros.
    let expected = b"    1234Ada Lovelace   1024.25\n      42Grace Hopper     -17.5\n";
    assert_eq!(fixedwidth::encode(&accounts[..]).unwrap(), expected);
}

#[derive(Debug, Default)]
struct Misdeclared {
    code: String,
    amount: i32,
}

impl Record for Misdeclared {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields
            .field("code", "1,4", |r| &r.code, |r| &mut r.code)
            .field("amount", "5-9", |r| &r.amount, |r| &mut r.amount);
    }
}

#[test]
fn misdeclared_range() {
    let expected = InvalidTag {
        field: "amount",
        tag: "5-9",
        reason: TagError::MissingComma,
    };

    assert_eq!(Descriptor::<Misdeclared>::build().unwrap_err(), expected);

    // The failure is cached and reported on every call.
    assert_eq!(Misdeclared::descriptor().unwrap_err(), expected);
    assert_eq!(Misdeclared::descriptor().unwrap_err(), expected);

    let mut record = Misdeclared::default();
    let err = fixedwidth::decode(b"ABCD00012", &mut record).unwrap_err();
    assert!(matches!(err, Error::InvalidTag(tag) if tag == expected));
    assert_eq!(record.code, "");

    let err = fixedwidth::encode(&record).unwrap_err();
    assert!(matches!(err, Error::InvalidTag(_)));
}

/// A field whose codec ignores the requested width.
#[derive(Debug, Default)]
struct Sloppy(u32);

impl FieldCodec for Sloppy {
    const CODEC: Codec = Codec::Integer;

    fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError> {
        self.0.decode_field(text)
    }

    fn encode_field(&self, _: usize) -> Result<Vec<u8>, CodecError> {
        Ok(self.0.to_string().into_bytes())
    }
}

#[derive(Debug, Default)]
struct Counter {
    count: Sloppy,
}

impl Record for Counter {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields.field("count", "1,3", |r| &r.count, |r| &mut r.count);
    }
}

#[test]
fn hand_written_codec_width() {
    // Short chunks are justified by the field's codec.
    assert_eq!(fixedwidth::encode(&Counter { count: Sloppy(7) }).unwrap(), b"  7\n");

    let err = fixedwidth::encode(&Counter { count: Sloppy(1234) }).unwrap_err();
    assert!(matches!(
        err,
        Error::Encode {
            record: 0,
            field: "count",
            source: CodecError::Overflow { len: 4, width: 3 },
        }
    ));
}

#[derive(Debug, Default)]
struct Header {
    kind: String,
}

impl Record for Header {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        fields.field("kind", "1,2", |r| &r.kind, |r| &mut r.kind);
    }
}

/// A record laid out after the header it follows.
#[derive(Debug, Default)]
struct Detail {
    kind: String,
    amount: i64,
}

impl Record for Detail {
    fn describe(fields: &mut DescriptorBuilder<Self>) {
        // Building the header here must not wait on the registry.
        let tag = match Header::descriptor() {
            Ok(header) if header.width() == 2 => "3,10",
            _ => "",
        };

        fields
            .field("kind", "1,2", |r| &r.kind, |r| &mut r.kind)
            .field("amount", tag, |r| &r.amount, |r| &mut r.amount);
    }
}

#[test]
fn describe_builds_other_descriptors() {
    let descriptor = Detail::descriptor().unwrap();
    assert_eq!(descriptor.fields()[1].range(), Range::new(3, 10).unwrap());
    assert_eq!(descriptor.width(), 10);

    let mut detail = Detail::default();
    fixedwidth::decode(b"DT    -250", &mut detail).unwrap();
    assert_eq!((detail.kind.as_str(), detail.amount), ("DT", -250));
}
