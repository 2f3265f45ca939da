//! ABI handling for the lockb0x Key contract.
//!
//! Fragments are kept in the human-readable form a JavaScript binding would
//! accept, e.g. `function balanceOf(address owner) view returns (uint256)`,
//! and parsed into an [`alloy_json_abi::JsonAbi`]. Parameter types are
//! canonicalised on parse (`uint` becomes `uint256`) so selectors always hash
//! the canonical signature. Calls are encoded and results decoded with
//! `alloy-dyn-abi`.

use alloy_dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi, Param, StateMutability};
use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// `mint() payable`
pub const MINT: &str = "function mint() external payable";
/// `mintPrice() view returns (uint256)`
pub const MINT_PRICE: &str = "function mintPrice() view returns (uint256)";
/// `totalMinted() view returns (uint256)`
pub const TOTAL_MINTED: &str = "function totalMinted() view returns (uint256)";
/// `balanceOf(address) view returns (uint256)`
pub const BALANCE_OF: &str = "function balanceOf(address owner) view returns (uint256)";
/// `verifyOwnership()`
pub const VERIFY_OWNERSHIP: &str = "function verifyOwnership() external";

/// ABI shipped with the mint page.
pub const MINT_ABI: &[&str] = &[MINT, MINT_PRICE, TOTAL_MINTED, BALANCE_OF];

/// ABI shipped with the verification page.
pub const VERIFY_ABI: &[&str] = &[BALANCE_OF, VERIFY_OWNERSHIP];

/// Union of both page ABIs.
pub const FULL_ABI: &[&str] = &[MINT, MINT_PRICE, TOTAL_MINTED, BALANCE_OF, VERIFY_OWNERSHIP];

/// Parses one human-readable function fragment into its canonical form.
pub fn parse_function(fragment: &str) -> Result<Function, AbiError> {
    let invalid = |reason: String| AbiError::InvalidFragment {
        fragment: fragment.to_string(),
        reason,
    };

    let mut function = Function::parse(fragment).map_err(|e| invalid(e.to_string()))?;
    if function.name.is_empty() {
        return Err(invalid("missing function name".to_string()));
    }
    for param in function.inputs.iter_mut().chain(function.outputs.iter_mut()) {
        canonicalize(param).map_err(|e| invalid(e.to_string()))?;
    }
    Ok(function)
}

fn canonicalize(param: &mut Param) -> Result<(), alloy_dyn_abi::Error> {
    if param.components.is_empty() {
        param.ty = DynSolType::parse(&param.ty)?.sol_type_name().into_owned();
    } else {
        for component in &mut param.components {
            canonicalize(component)?;
        }
    }
    Ok(())
}

/// A contract ABI: the set of functions a binding is allowed to call.
///
/// Two ABIs are equal when they were built from the same fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ContractAbi {
    fragments: Vec<String>,
    abi: JsonAbi,
}

impl ContractAbi {
    /// Parses a list of human-readable fragments.
    pub fn parse<I, S>(fragments: I) -> Result<Self, AbiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fragments: Vec<String> = fragments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let functions = fragments
            .iter()
            .map(|f| parse_function(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_functions(fragments, functions))
    }

    /// The ABI of the mint page.
    pub fn mint() -> Self {
        Self::from_functions(
            to_owned(MINT_ABI),
            vec![mint(), mint_price(), total_minted(), balance_of()],
        )
    }

    /// The ABI of the verification page.
    pub fn verify() -> Self {
        Self::from_functions(to_owned(VERIFY_ABI), vec![balance_of(), verify_ownership()])
    }

    /// Both page ABIs combined.
    pub fn full() -> Self {
        Self::from_functions(
            to_owned(FULL_ABI),
            vec![
                mint(),
                mint_price(),
                total_minted(),
                balance_of(),
                verify_ownership(),
            ],
        )
    }

    fn from_functions(fragments: Vec<String>, functions: Vec<Function>) -> Self {
        let mut abi = JsonAbi::default();
        for function in functions {
            abi.functions
                .entry(function.name.clone())
                .or_default()
                .push(function);
        }
        Self { fragments, abi }
    }

    /// Looks up a function by name. Overloads resolve to the first declared.
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| AbiError::MethodNotDeclared(name.to_string()))
    }

    /// Returns `true` if the ABI declares `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.function(name).is_ok()
    }

    /// Returns the declared functions.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.abi.functions()
    }

    /// Number of declared functions, counting overloads.
    pub fn len(&self) -> usize {
        self.abi.functions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the parsed JSON ABI.
    pub fn json_abi(&self) -> &JsonAbi {
        &self.abi
    }
}

impl PartialEq for ContractAbi {
    fn eq(&self, other: &Self) -> bool {
        self.fragments == other.fragments
    }
}

impl Eq for ContractAbi {}

impl Default for ContractAbi {
    fn default() -> Self {
        Self::full()
    }
}

impl TryFrom<Vec<String>> for ContractAbi {
    type Error = AbiError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContractAbi> for Vec<String> {
    fn from(value: ContractAbi) -> Self {
        value.fragments
    }
}

fn to_owned(fragments: &[&str]) -> Vec<String> {
    fragments.iter().map(|s| s.to_string()).collect()
}

// Built-in functions. These must match the fragment constants above
// (`test_builtin_abis_match_fragments`).

fn param(ty: &str, name: &str) -> Param {
    Param {
        ty: ty.to_string(),
        name: name.to_string(),
        components: Vec::new(),
        internal_type: None,
    }
}

fn builtin(
    name: &str,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        state_mutability,
    }
}

fn mint() -> Function {
    builtin("mint", vec![], vec![], StateMutability::Payable)
}

fn mint_price() -> Function {
    builtin("mintPrice", vec![], vec![param("uint256", "")], StateMutability::View)
}

fn total_minted() -> Function {
    builtin("totalMinted", vec![], vec![param("uint256", "")], StateMutability::View)
}

fn balance_of() -> Function {
    builtin(
        "balanceOf",
        vec![param("address", "owner")],
        vec![param("uint256", "")],
        StateMutability::View,
    )
}

fn verify_ownership() -> Function {
    builtin("verifyOwnership", vec![], vec![], StateMutability::NonPayable)
}

/// Encodes a call to `function` with `args`: selector followed by ABI words.
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Bytes, AbiError> {
    function
        .abi_encode_input(args)
        .map(Bytes::from)
        .map_err(|source| AbiError::Encode {
            function: function.signature(),
            source,
        })
}

/// Decodes the single `uint` return value of `function`.
pub fn decode_uint(function: &Function, data: &[u8]) -> Result<U256, AbiError> {
    let values = function
        .abi_decode_output(data)
        .map_err(|source| AbiError::Decode {
            function: function.signature(),
            source,
        })?;
    match values.as_slice() {
        [value] => value
            .as_uint()
            .map(|(value, _bits)| value)
            .ok_or_else(|| AbiError::UnexpectedOutput(function.signature())),
        _ => Err(AbiError::UnexpectedOutput(function.signature())),
    }
}

/// Errors raised while parsing fragments, encoding calls or decoding results.
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// The fragment is not a recognisable function declaration.
    #[error("Invalid ABI fragment {fragment:?}: {reason}")]
    InvalidFragment { fragment: String, reason: String },

    /// The bound ABI does not declare the requested method.
    #[error("contract.{0} is not a function")]
    MethodNotDeclared(String),

    #[error("Cannot encode call to {function}: {source}")]
    Encode {
        function: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    #[error("Cannot decode result of {function}: {source}")]
    Decode {
        function: String,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// The declared outputs are not a single unsigned integer.
    #[error("{0} does not return a single uint")]
    UnexpectedOutput(String),
}
