//! Command registry and dispatch.
//!
//! Commands are described by a [`CommandBuilder`]: a name, a handler, and
//! either an ordered list of parameters (each optionally defaulted and
//! optionally converted) or a variadic marker. Descriptors are validated as
//! they are registered on a [`RegistryBuilder`]; `build()` freezes the set
//! into a read-only [`Registry`] shared by every connection.

use super::args::{Args, Converter, Value};
use super::context::Context;
use crate::error::{HandlerError, HandlerResult, RegistryError};
use crate::telemetry::CommandTimer;
use std::collections::HashMap;
use tracing::{Level, debug, span};

/// A command handler.
pub type HandlerFn = fn(&mut Context<'_>, &Args) -> HandlerResult;

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    /// `None` marks the parameter as required.
    pub default: Option<Value>,
    pub converter: Option<Converter>,
}

#[derive(Debug, Clone)]
enum Signature {
    Fixed(Vec<Param>),
    Variadic,
}

/// Declarative description of a command, checked at registration.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: &'static str,
    handler: Option<HandlerFn>,
    auth_required: bool,
    listable: bool,
    params: Vec<(&'static str, Option<Value>)>,
    variadic: bool,
    converters: Vec<(&'static str, Converter)>,
}

impl CommandBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handler: None,
            auth_required: true,
            listable: true,
            params: Vec::new(),
            variadic: false,
            converters: Vec::new(),
        }
    }

    /// Declare a required parameter.
    pub fn param(mut self, name: &'static str) -> Self {
        self.params.push((name, None));
        self
    }

    /// Declare an optional parameter and the value it takes when omitted.
    pub fn optional(mut self, name: &'static str, default: Value) -> Self {
        self.params.push((name, Some(default)));
        self
    }

    /// Accept any number of raw tokens instead of named parameters.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Convert the token bound to `param` before calling the handler.
    pub fn convert(mut self, param: &'static str, converter: Converter) -> Self {
        self.converters.push((param, converter));
        self
    }

    /// Allow the command before the client has authenticated.
    pub fn no_auth(mut self) -> Self {
        self.auth_required = false;
        self
    }

    /// Hide the command from `commands` / `notcommands`.
    pub fn unlisted(mut self) -> Self {
        self.listable = false;
        self
    }

    pub fn handler(mut self, handler: HandlerFn) -> Self {
        self.handler = Some(handler);
        self
    }

    fn validate(self) -> Result<CommandSpec, RegistryError> {
        let command = self.name;
        if command.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let handler = self.handler.ok_or(RegistryError::MissingHandler(command))?;

        let signature = if self.variadic {
            if !self.params.is_empty() {
                return Err(RegistryError::VariadicWithParams(command));
            }
            if let Some((param, _)) = self.converters.first() {
                return Err(RegistryError::UnknownParam { command, param });
            }
            Signature::Variadic
        } else {
            let mut params: Vec<Param> = Vec::with_capacity(self.params.len());
            for (name, default) in self.params {
                if params.iter().any(|p| p.name == name) {
                    return Err(RegistryError::DuplicateParam { command, param: name });
                }
                if default.is_none() && params.iter().any(|p| p.default.is_some()) {
                    return Err(RegistryError::RequiredAfterOptional { command, param: name });
                }
                params.push(Param {
                    name,
                    default,
                    converter: None,
                });
            }
            for (name, converter) in self.converters {
                let param = params
                    .iter_mut()
                    .find(|p| p.name == name)
                    .ok_or(RegistryError::UnknownParam { command, param: name })?;
                param.converter = Some(converter);
            }
            Signature::Fixed(params)
        };

        Ok(CommandSpec {
            name: command,
            handler,
            auth_required: self.auth_required,
            listable: self.listable,
            signature,
        })
    }
}

/// A registered, immutable command.
#[derive(Debug)]
pub struct CommandSpec {
    name: &'static str,
    handler: HandlerFn,
    auth_required: bool,
    listable: bool,
    signature: Signature,
}

impl CommandSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn auth_required(&self) -> bool {
        self.auth_required
    }

    pub fn listable(&self) -> bool {
        self.listable
    }

    /// Bind raw tokens to the declared parameters and run the handler.
    pub fn invoke(&self, ctx: &mut Context<'_>, tokens: &[String]) -> HandlerResult {
        let args = self.bind(tokens)?;
        (self.handler)(ctx, &args)
    }

    fn bind(&self, tokens: &[String]) -> Result<Args, HandlerError> {
        let params = match &self.signature {
            Signature::Variadic => return Ok(Args::Rest(tokens.to_vec())),
            Signature::Fixed(params) => params,
        };

        let required = params.iter().filter(|p| p.default.is_none()).count();
        if tokens.len() < required || tokens.len() > params.len() {
            return Err(HandlerError::WrongArgCount(self.name));
        }

        let mut bound = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            let value = match (tokens.get(i), param.converter) {
                (Some(token), Some(convert)) => {
                    convert(token).map_err(|source| {
                        debug!(command = self.name, param = param.name, token = %token, "Argument rejected");
                        HandlerError::Conversion {
                            param: param.name,
                            source,
                        }
                    })?
                }
                (Some(token), None) => Value::Str(token.clone()),
                // Arity was checked above, so an unfilled slot is optional.
                (None, _) => param.default.clone().unwrap_or(Value::Absent),
            };
            bound.push((param.name, value));
        }
        Ok(Args::Named(bound))
    }
}

/// Collects and validates command descriptors during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: HashMap<&'static str, CommandSpec>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one command, rejecting malformed or duplicate descriptors.
    pub fn register(&mut self, command: CommandBuilder) -> Result<&mut Self, RegistryError> {
        let spec = command.validate()?;
        if self.commands.contains_key(spec.name) {
            return Err(RegistryError::Duplicate(spec.name));
        }
        self.commands.insert(spec.name, spec);
        Ok(self)
    }

    /// Freeze the registry. No command can be added afterwards.
    pub fn build(self) -> Registry {
        Registry {
            commands: self.commands,
        }
    }
}

/// Registry of command handlers. Read-only once built.
#[derive(Debug)]
pub struct Registry {
    commands: HashMap<&'static str, CommandSpec>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Look up the command named by the first token and run it with the rest.
    pub fn resolve_and_call(&self, ctx: &mut Context<'_>, tokens: &[String]) -> HandlerResult {
        let Some((name, args)) = tokens.split_first() else {
            return Err(HandlerError::NoCommand);
        };
        let Some(spec) = self.commands.get(name.as_str()) else {
            return Err(HandlerError::UnknownCommand(name.clone()));
        };

        let command_span = span!(
            Level::DEBUG,
            "mpd.command",
            command = spec.name,
            connection = ctx.id,
            args = args.len(),
        );
        let _entered = command_span.enter();
        let _timer = CommandTimer::new(spec.name);

        let result = spec.invoke(ctx, args);
        if let Err(ref e) = result {
            debug!(command = spec.name, code = e.error_code(), error = %e, "Command error");
        }
        result
    }
}
