//! The static command table.

/// Characters a slot accepts. Classes filter syntax only; numeric ranges are
/// checked later by the command's validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// One or more hexadecimal digits.
    Hex,
    /// One or more decimal digits.
    Dec,
    /// Exactly one of the listed words.
    OneOf(&'static [&'static str]),
    /// Any token.
    Text,
}

impl CharClass {
    pub(crate) fn accepts(self, token: &str) -> bool {
        match self {
            Self::Hex => !token.is_empty() && token.chars().all(|ch| ch.is_ascii_hexdigit()),
            Self::Dec => !token.is_empty() && token.chars().all(|ch| ch.is_ascii_digit()),
            Self::OneOf(words) => words.contains(&token),
            Self::Text => !token.is_empty(),
        }
    }
}

/// A named positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) name: &'static str,
    pub(crate) class: CharClass,
}

const fn slot(name: &'static str, class: CharClass) -> Slot {
    Slot { name, class }
}

/// Operations the console can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Command {
    Help,
    Exit,
    Info,
    Rand,
    Reboot,
    Stack,
    StackAll,
    SelfTest,
    ShowDate,
    SetDate,
    Resolve,
    Fetch,
    I2cRead,
    CardRead,
    MemoryDisplay,
    MemoryWrite,
    Led,
    CipherBenchmark,
    FuseRead,
}

/// A keyword with typed argument slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Signature {
    pub(crate) keyword: &'static str,
    pub(crate) slots: &'static [Slot],
    pub(crate) command: Command,
}

impl Signature {
    /// Returns whether `arguments` fit the slots one to one.
    pub(crate) fn accepts(&self, arguments: &[&str]) -> bool {
        arguments.len() == self.slots.len() && self.rejected_slot(arguments).is_none()
    }

    /// Names the first slot whose class refuses its token.
    pub(crate) fn rejected_slot(&self, arguments: &[&str]) -> Option<&'static str> {
        self.slots
            .iter()
            .zip(arguments)
            .find(|(slot, token)| !slot.class.accepts(token))
            .map(|(slot, _)| slot.name)
    }
}

const LED_NAMES: &[&str] = &["white", "blue"];
const LED_STATES: &[&str] = &["on", "off"];

/// Argument-free commands, matched on the whole line before any signature.
pub(crate) static LITERALS: &[(&str, Command)] = &[
    ("help", Command::Help),
    ("exit", Command::Exit),
    ("quit", Command::Exit),
    ("info", Command::Info),
    ("rand", Command::Rand),
    ("reboot", Command::Reboot),
    ("stack", Command::Stack),
    ("stackall", Command::StackAll),
    ("test", Command::SelfTest),
];

/// Signatures in priority order, most specific first.
///
/// No two entries share a keyword and arity, so at most one can accept a
/// given line; the order only decides which is tried first.
pub(crate) static SIGNATURES: &[Signature] = &[
    Signature {
        keyword: "i2c",
        slots: &[
            slot("bus index", CharClass::Dec),
            slot("slave", CharClass::Hex),
            slot("address", CharClass::Hex),
            slot("size", CharClass::Dec),
        ],
        command: Command::I2cRead,
    },
    Signature {
        keyword: "mmc",
        slots: &[
            slot("card index", CharClass::Dec),
            slot("address", CharClass::Hex),
            slot("size", CharClass::Dec),
        ],
        command: Command::CardRead,
    },
    Signature {
        keyword: "md",
        // Size is decimal, but hex digits still match so `md 0 ff` reports
        // an invalid size instead of an unknown command.
        slots: &[
            slot("address", CharClass::Hex),
            slot("size", CharClass::Hex),
        ],
        command: Command::MemoryDisplay,
    },
    Signature {
        keyword: "mw",
        slots: &[
            slot("address", CharClass::Hex),
            slot("data", CharClass::Hex),
        ],
        command: Command::MemoryWrite,
    },
    Signature {
        keyword: "led",
        slots: &[
            slot("led", CharClass::OneOf(LED_NAMES)),
            slot("state", CharClass::OneOf(LED_STATES)),
        ],
        command: Command::Led,
    },
    Signature {
        keyword: "dcp",
        slots: &[
            slot("size", CharClass::Dec),
            slot("duration", CharClass::Dec),
        ],
        command: Command::CipherBenchmark,
    },
    Signature {
        keyword: "otp",
        slots: &[slot("bank", CharClass::Dec), slot("word", CharClass::Dec)],
        command: Command::FuseRead,
    },
    Signature {
        keyword: "date",
        slots: &[slot("date", CharClass::Text)],
        command: Command::SetDate,
    },
    Signature {
        keyword: "date",
        slots: &[],
        command: Command::ShowDate,
    },
    Signature {
        keyword: "dns",
        slots: &[slot("fqdn", CharClass::Text)],
        command: Command::Resolve,
    },
    Signature {
        keyword: "curl",
        slots: &[slot("url", CharClass::Text)],
        command: Command::Fetch,
    },
];
