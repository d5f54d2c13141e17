//! Line commands of the interactive shell.

use agenda_core::{RecordId, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tab(Tab),
    New,
    Edit(RecordId),
    Delete(RecordId),
    Set { field: String, value: String },
    Submit,
    Cancel,
    /// `None` clears the selection.
    Professional(Option<RecordId>),
    Date(String),
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
comandos:
  tab <pacientes|profissionais|consultas|agenda>
  novo                      abre o formulário de cadastro
  editar <id>               abre o formulário de edição
  excluir <id>              exclui o registro (pede confirmação)
  set <campo> <valor>       altera um campo do formulário
  salvar                    envia o formulário
  cancelar                  volta para a lista
  pro [id]                  seleciona (ou limpa) o profissional da agenda
  data <AAAA-MM-DD>         seleciona a data da agenda
  atualizar                 recarrega a página
  ajuda
  sair";

fn parse_tab(name: &str) -> Result<Tab, String> {
    match name {
        "pacientes" => Ok(Tab::Patients),
        "profissionais" => Ok(Tab::Professionals),
        "consultas" => Ok(Tab::Appointments),
        "agenda" => Ok(Tab::Agenda),
        other => Err(format!("aba desconhecida: {other}")),
    }
}

fn record_id(arg: &str) -> Result<RecordId, String> {
    if arg.is_empty() {
        return Err("informe o id".to_string());
    }
    match arg.parse() {
        Ok(id) => Ok(id),
        Err(never) => match never {},
    }
}

impl Command {
    /// Parse one input line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "tab" => Command::Tab(parse_tab(rest)?),
            "pacientes" | "profissionais" | "consultas" | "agenda" if rest.is_empty() => {
                Command::Tab(parse_tab(word)?)
            }
            "novo" | "new" => Command::New,
            "editar" | "edit" => Command::Edit(record_id(rest)?),
            "excluir" | "delete" => Command::Delete(record_id(rest)?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("uso: set <campo> <valor>".to_string());
                }
                Command::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "salvar" | "submit" => Command::Submit,
            "cancelar" | "cancel" => Command::Cancel,
            "pro" if rest.is_empty() => Command::Professional(None),
            "pro" => Command::Professional(Some(record_id(rest)?)),
            "data" | "date" => Command::Date(rest.to_string()),
            "atualizar" | "refresh" => Command::Refresh,
            "ajuda" | "help" | "?" => Command::Help,
            "sair" | "quit" | "exit" => Command::Quit,
            other => return Err(format!("comando desconhecido: {other}")),
        };
        Ok(Some(command))
    }
}
